use serde::{Deserialize, Serialize};

use super::shipment::generate_id;

/// Transporter registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransporter {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_type: String,
}

impl NewTransporter {
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("vehicleType", &self.vehicle_type),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

/// Transporter. The authority never mutates one after registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transporter {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub vehicle_type: String,
}

impl Transporter {
    pub fn from_request(request: &NewTransporter) -> Self {
        Self {
            id: generate_id("TRN"),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: request.phone.trim().to_string(),
            vehicle_type: request.vehicle_type.trim().to_string(),
        }
    }

    /// Exact, case-sensitive vehicle type match
    pub fn can_carry(&self, vehicle_type: &str) -> bool {
        self.vehicle_type == vehicle_type
    }
}
