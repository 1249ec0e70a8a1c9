use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ShipmentStatus;

/// Shipment creation request (what the caller wants moved)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShipment {
    pub origin: String,
    pub destination: String,
    pub route: String,
    pub vehicle_type: String,
}

impl NewShipment {
    /// Name of the first empty field, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("origin", &self.origin),
            ("destination", &self.destination),
            ("route", &self.route),
            ("vehicleType", &self.vehicle_type),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Shipment (tracked by the assignment authority)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub route: String,
    pub vehicle_type: String,
    pub created_at: DateTime<Utc>,
    pub status: ShipmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<String>,
}

impl Shipment {
    pub fn from_request(request: &NewShipment) -> Self {
        Self {
            id: generate_id("SHP"),
            origin: request.origin.trim().to_string(),
            destination: request.destination.trim().to_string(),
            route: request.route.trim().to_string(),
            vehicle_type: request.vehicle_type.trim().to_string(),
            created_at: Utc::now(),
            status: ShipmentStatus::NotAssigned,
            transporter_id: None,
        }
    }

    /// Is this shipment currently holding `transporter_id` busy?
    pub fn engages(&self, transporter_id: &str) -> bool {
        self.status.engages_transporter() && self.transporter_id.as_deref() == Some(transporter_id)
    }

    /// Describe why the status/binding pair breaks the data model, if it does
    pub fn binding_violation(&self) -> Option<String> {
        match (&self.transporter_id, self.status) {
            (None, status) if status.requires_transporter() => Some(format!(
                "shipment {} is {} but has no transporter",
                self.id, status
            )),
            (Some(t), ShipmentStatus::NotAssigned) => Some(format!(
                "shipment {} is not-assigned but references transporter {}",
                self.id, t
            )),
            _ => None,
        }
    }
}

/// Short, human-friendly identifier such as `SHP-1A2B3C4D`
pub(crate) fn generate_id(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, raw[..8].to_uppercase())
}
