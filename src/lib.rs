pub mod api;
pub mod authority;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod seed;
pub mod simulator;
pub mod viewmodel;

pub use authority::{AssignmentAuthority, ShipmentEvent};
pub use config::AppConfig;
pub use domain::{NewShipment, NewTransporter, Shipment, ShipmentStatus, Transporter};
pub use error::{AssignmentError, AssignmentErrorKind, Result, ShiptrackError};
pub use simulator::{ShipmentGateway, StatusSimulator};
pub use viewmodel::{AssignmentOutcome, AssignmentViewModel};
