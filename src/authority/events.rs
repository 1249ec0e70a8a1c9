use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Shipment, ShipmentStatus, Transporter};

/// Change notification published after every committed write
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShipmentEvent {
    ShipmentCreated {
        shipment: Shipment,
        at: DateTime<Utc>,
    },
    TransporterCreated {
        transporter: Transporter,
        at: DateTime<Utc>,
    },
    Assigned {
        shipment: Shipment,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous_transporter: Option<String>,
        at: DateTime<Utc>,
    },
    StatusChanged {
        shipment: Shipment,
        from: ShipmentStatus,
        to: ShipmentStatus,
        at: DateTime<Utc>,
    },
}
