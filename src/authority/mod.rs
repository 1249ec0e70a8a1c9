//! Assignment Authority
//!
//! Single owner of shipment and transporter records. Every write (assign,
//! status overwrite, creation) validates and commits under one exclusive
//! lock, so the double-booking scan and the commit are never interleaved
//! with another writer. Committed writes are announced on a broadcast
//! channel for read-model consumers.

pub mod authority;
pub mod events;
pub mod registry;

pub use authority::AssignmentAuthority;
pub use events::ShipmentEvent;
pub use registry::{Registry, RegistrySnapshot};
