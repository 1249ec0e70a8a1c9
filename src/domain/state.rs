use serde::{Deserialize, Serialize};
use std::fmt;

/// Shipment lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShipmentStatus {
    /// Created, no transporter bound yet
    NotAssigned,
    /// Transporter bound, not moving yet
    Assigned,
    /// Transporter actively moving the goods
    InTransit,
    /// Goods handed over
    Delivered,
    /// Withdrawn before delivery
    Cancelled,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 5] = [
        ShipmentStatus::NotAssigned,
        ShipmentStatus::Assigned,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
        ShipmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::NotAssigned => "not-assigned",
            ShipmentStatus::Assigned => "assigned",
            ShipmentStatus::InTransit => "in-transit",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
        }
    }

    /// Does a shipment in this state keep its transporter busy?
    pub fn engages_transporter(&self) -> bool {
        matches!(self, ShipmentStatus::Assigned | ShipmentStatus::InTransit)
    }

    /// Must a shipment in this state carry a transporter id?
    pub fn requires_transporter(&self) -> bool {
        matches!(
            self,
            ShipmentStatus::Assigned | ShipmentStatus::InTransit | ShipmentStatus::Delivered
        )
    }

    /// Can a (new) transporter still be bound in this state?
    pub fn accepts_assignment(&self) -> bool {
        matches!(self, ShipmentStatus::NotAssigned | ShipmentStatus::Assigned)
    }

    /// No lifecycle transitions leave these states
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }

    /// Lifecycle successor reachable by the status simulator, if any
    pub fn progression(&self) -> Option<ShipmentStatus> {
        match self {
            ShipmentStatus::Assigned => Some(ShipmentStatus::InTransit),
            ShipmentStatus::InTransit => Some(ShipmentStatus::Delivered),
            // Not-assigned waits for a transporter; terminal states stay put
            _ => None,
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ShipmentStatus {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "not-assigned" => Ok(ShipmentStatus::NotAssigned),
            "assigned" => Ok(ShipmentStatus::Assigned),
            "in-transit" => Ok(ShipmentStatus::InTransit),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "cancelled" => Ok(ShipmentStatus::Cancelled),
            _ => Err(format!("Unknown shipment status: {}", s)),
        }
    }
}

/// Status transition record (for logging and change notification)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    pub shipment_id: String,
    pub from: ShipmentStatus,
    pub to: ShipmentStatus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl StatusTransition {
    pub fn new(shipment_id: impl Into<String>, from: ShipmentStatus, to: ShipmentStatus) -> Self {
        Self {
            shipment_id: shipment_id.into(),
            from,
            to,
            timestamp: chrono::Utc::now(),
        }
    }
}
