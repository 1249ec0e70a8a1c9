use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::config::AuthorityConfig;
use crate::domain::{
    busy_set, BusyTransporter, NewShipment, NewTransporter, Shipment, ShipmentStatus, Transporter,
};
use crate::error::{AssignmentError, Result, ShiptrackError};

use super::events::ShipmentEvent;
use super::registry::{Registry, RegistrySnapshot};

/// Canonical validator and mutator of shipment/transporter bindings.
///
/// Construct one per process (or per test); share it behind an `Arc`.
pub struct AssignmentAuthority {
    registry: RwLock<Registry>,
    events: broadcast::Sender<ShipmentEvent>,
    enforce_status_lock: bool,
}

impl AssignmentAuthority {
    /// Create an authority with no records
    pub fn new(config: &AuthorityConfig) -> Self {
        Self::from_registry(Registry::default(), config)
    }

    /// Create an authority seeded with existing records.
    ///
    /// Fails when the records already break an invariant (dangling transporter
    /// reference, double-booking, status without transporter).
    pub fn with_records(
        shipments: Vec<Shipment>,
        transporters: Vec<Transporter>,
        config: &AuthorityConfig,
    ) -> Result<Self> {
        let registry =
            Registry::from_records(shipments, transporters).map_err(ShiptrackError::Validation)?;
        Ok(Self::from_registry(registry, config))
    }

    fn from_registry(registry: Registry, config: &AuthorityConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            registry: RwLock::new(registry),
            events,
            enforce_status_lock: config.enforce_status_lock,
        }
    }

    /// Subscribe to committed-write notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ShipmentEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: ShipmentEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Bind a transporter to a shipment (also used for re-assignment)
    pub async fn assign(
        &self,
        shipment_id: &str,
        transporter_id: &str,
    ) -> std::result::Result<Shipment, AssignmentError> {
        let result = {
            let mut registry = self.registry.write().await;
            registry.assign(shipment_id, transporter_id, self.enforce_status_lock)
        };

        match result {
            Ok(assignment) => {
                match assignment.previous_transporter.as_deref() {
                    Some(previous) => info!(
                        "Shipment {} re-assigned from {} to {}",
                        shipment_id, previous, transporter_id
                    ),
                    None => info!(
                        "Shipment {} assigned to transporter {}",
                        shipment_id, transporter_id
                    ),
                }
                self.publish(ShipmentEvent::Assigned {
                    shipment: assignment.shipment.clone(),
                    previous_transporter: assignment.previous_transporter,
                    at: Utc::now(),
                });
                Ok(assignment.shipment)
            }
            Err(e) => {
                warn!(
                    kind = %e.kind(),
                    "Assignment of {} to {} rejected: {}",
                    transporter_id, shipment_id, e
                );
                Err(e)
            }
        }
    }

    /// Persist a status for a shipment. The lifecycle table is the caller's
    /// concern; this only guards the status/binding invariants.
    pub async fn advance_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> std::result::Result<Shipment, AssignmentError> {
        let result = {
            let mut registry = self.registry.write().await;
            registry.set_status(shipment_id, status)
        };

        match result {
            Ok(change) => {
                if change.from != status {
                    info!("Shipment {} status {} -> {}", shipment_id, change.from, status);
                    self.publish(ShipmentEvent::StatusChanged {
                        shipment: change.shipment.clone(),
                        from: change.from,
                        to: status,
                        at: Utc::now(),
                    });
                } else {
                    debug!("Shipment {} status unchanged ({})", shipment_id, status);
                }
                Ok(change.shipment)
            }
            Err(e) => {
                warn!(
                    kind = %e.kind(),
                    "Status update of {} to {} rejected: {}",
                    shipment_id, status, e
                );
                Err(e)
            }
        }
    }

    /// Request-shaped variant of [`advance_status`](Self::advance_status):
    /// unknown shipments are reported before a missing or unparseable status.
    pub async fn advance_status_raw(
        &self,
        shipment_id: &str,
        status: Option<&str>,
    ) -> std::result::Result<Shipment, AssignmentError> {
        if self.registry.read().await.shipment(shipment_id).is_none() {
            return Err(AssignmentError::shipment_not_found(shipment_id));
        }
        let raw = status
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AssignmentError::InvalidRequest("status is required".to_string()))?;
        let status = ShipmentStatus::try_from(raw).map_err(AssignmentError::InvalidRequest)?;
        self.advance_status(shipment_id, status).await
    }

    pub async fn create_shipment(
        &self,
        request: NewShipment,
    ) -> std::result::Result<Shipment, AssignmentError> {
        let shipment = self.registry.write().await.insert_shipment(&request)?;
        info!(
            "Shipment {} created ({} -> {}, {})",
            shipment.id, shipment.origin, shipment.destination, shipment.vehicle_type
        );
        self.publish(ShipmentEvent::ShipmentCreated {
            shipment: shipment.clone(),
            at: Utc::now(),
        });
        Ok(shipment)
    }

    pub async fn create_transporter(
        &self,
        request: NewTransporter,
    ) -> std::result::Result<Transporter, AssignmentError> {
        let transporter = self.registry.write().await.insert_transporter(&request)?;
        info!(
            "Transporter {} registered ({}, {})",
            transporter.id, transporter.name, transporter.vehicle_type
        );
        self.publish(ShipmentEvent::TransporterCreated {
            transporter: transporter.clone(),
            at: Utc::now(),
        });
        Ok(transporter)
    }

    pub async fn list_shipments(&self) -> Vec<Shipment> {
        self.registry.read().await.shipments().to_vec()
    }

    pub async fn list_transporters(&self) -> Vec<Transporter> {
        self.registry.read().await.transporters().to_vec()
    }

    pub async fn get_shipment(&self, id: &str) -> std::result::Result<Shipment, AssignmentError> {
        self.registry
            .read()
            .await
            .shipment(id)
            .cloned()
            .ok_or_else(|| AssignmentError::shipment_not_found(id))
    }

    pub async fn get_transporter(
        &self,
        id: &str,
    ) -> std::result::Result<Transporter, AssignmentError> {
        self.registry
            .read()
            .await
            .transporter(id)
            .cloned()
            .ok_or_else(|| AssignmentError::transporter_not_found(id))
    }

    /// Shipments and transporters read under a single lock
    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.registry.read().await.snapshot()
    }

    /// Current busy-set, recomputed from the shipment list
    pub async fn busy_transporters(&self) -> Vec<BusyTransporter> {
        busy_set(self.registry.read().await.shipments())
    }
}
