use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ShipmentStatus;

/// Main error type for the shipment tracking service
#[derive(Error, Debug)]
pub enum ShiptrackError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Assignment / status write rejected by the authority
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    // Seed fixture or config values that break an invariant
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ShiptrackError
pub type Result<T> = std::result::Result<T, ShiptrackError>;

/// Machine-checkable kind of a rejected authority call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentErrorKind {
    NotFound,
    InvalidRequest,
    VehicleTypeMismatch,
    TransporterBusy,
}

impl AssignmentErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidRequest => "InvalidRequest",
            Self::VehicleTypeMismatch => "VehicleTypeMismatch",
            Self::TransporterBusy => "TransporterBusy",
        }
    }
}

impl std::fmt::Display for AssignmentErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which kind of record a NotFound refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Shipment,
    Transporter,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordKind::Shipment => write!(f, "Shipment"),
            RecordKind::Transporter => write!(f, "Transporter"),
        }
    }
}

/// Rejections from the assignment authority. None of these are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(
        "Vehicle type mismatch: shipment requires {required}, but transporter has {supplied}"
    )]
    VehicleTypeMismatch { required: String, supplied: String },

    #[error(
        "Transporter {transporter_id} is already {phrase} shipment {shipment_id}",
        phrase = busy_phrase(.status)
    )]
    TransporterBusy {
        transporter_id: String,
        shipment_id: String,
        status: ShipmentStatus,
    },
}

fn busy_phrase(status: &ShipmentStatus) -> &'static str {
    match status {
        ShipmentStatus::InTransit => "actively transporting",
        _ => "assigned to",
    }
}

impl AssignmentError {
    pub fn shipment_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Shipment,
            id: id.to_string(),
        }
    }

    pub fn transporter_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: RecordKind::Transporter,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> AssignmentErrorKind {
        match self {
            Self::NotFound { .. } => AssignmentErrorKind::NotFound,
            Self::InvalidRequest(_) => AssignmentErrorKind::InvalidRequest,
            Self::VehicleTypeMismatch { .. } => AssignmentErrorKind::VehicleTypeMismatch,
            Self::TransporterBusy { .. } => AssignmentErrorKind::TransporterBusy,
        }
    }
}
