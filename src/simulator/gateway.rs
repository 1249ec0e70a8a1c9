use async_trait::async_trait;

use crate::authority::AssignmentAuthority;
use crate::domain::{Shipment, ShipmentStatus};
use crate::error::AssignmentError;

/// The two authority calls the status simulator needs.
///
/// Tests drive ticks against a failing or scripted backend through it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShipmentGateway: Send + Sync {
    async fn list_shipments(&self) -> Result<Vec<Shipment>, AssignmentError>;

    async fn advance_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> Result<Shipment, AssignmentError>;
}

#[async_trait]
impl ShipmentGateway for AssignmentAuthority {
    async fn list_shipments(&self) -> Result<Vec<Shipment>, AssignmentError> {
        Ok(AssignmentAuthority::list_shipments(self).await)
    }

    async fn advance_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> Result<Shipment, AssignmentError> {
        AssignmentAuthority::advance_status(self, shipment_id, status).await
    }
}
