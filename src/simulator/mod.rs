//! Status Simulator
//!
//! Periodically picks one shipment at random and rolls it forward through
//! the lifecycle (assigned -> in-transit -> delivered), persisting each
//! change through the assignment authority.

pub mod gateway;
pub mod simulator;
pub mod transition;

pub use gateway::ShipmentGateway;
pub use simulator::{SimulatorStats, StatusSimulator, TickOutcome, TickTransition};
pub use transition::TransitionTable;
