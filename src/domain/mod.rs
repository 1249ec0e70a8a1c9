pub mod assignment;
pub mod shipment;
pub mod state;
pub mod transporter;

pub use assignment::*;
pub use shipment::*;
pub use state::*;
pub use transporter::*;
