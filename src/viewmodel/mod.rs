//! Assignment Client View-Model
//!
//! Consumer-side read model over the assignment authority. It derives the
//! candidate lists a caller should present for a shipment and submits
//! assignment requests, reporting failures as data rather than errors.

pub mod candidates;

pub use candidates::{
    available_for_reassignment, can_assign, compatible_transporters, unavailable_transporters,
    CandidateSet, UnavailableTransporter,
};

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::authority::{AssignmentAuthority, RegistrySnapshot};
use crate::domain::{BusyTransporter, Shipment, Transporter};
use crate::error::{AssignmentError, AssignmentErrorKind};

/// Structured result of a submitted assignment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment: Option<Shipment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<AssignmentErrorKind>,
}

impl AssignmentOutcome {
    fn succeeded(shipment: Shipment) -> Self {
        let message = format!(
            "Transporter {} assigned to shipment {}",
            shipment.transporter_id.as_deref().unwrap_or_default(),
            shipment.id
        );
        Self {
            success: true,
            message,
            shipment: Some(shipment),
            error_kind: None,
        }
    }

    fn failed(err: &AssignmentError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            shipment: None,
            error_kind: Some(err.kind()),
        }
    }
}

pub struct AssignmentViewModel {
    authority: Arc<AssignmentAuthority>,
    snapshot: RwLock<RegistrySnapshot>,
}

impl AssignmentViewModel {
    pub fn new(authority: Arc<AssignmentAuthority>) -> Self {
        Self {
            authority,
            snapshot: RwLock::new(RegistrySnapshot::default()),
        }
    }

    /// Re-read shipments and transporters from the authority
    pub async fn refresh(&self) -> RegistrySnapshot {
        let fresh = self.authority.snapshot().await;
        *self.snapshot.write().await = fresh.clone();
        fresh
    }

    /// Last read model (may lag the authority until the next refresh)
    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn compatible_transporters(&self, shipment: &Shipment) -> Vec<Transporter> {
        let snap = self.snapshot.read().await;
        compatible_transporters(shipment, &snap.shipments, &snap.transporters)
    }

    pub async fn available_for_reassignment(&self, shipment: &Shipment) -> Vec<Transporter> {
        let snap = self.snapshot.read().await;
        available_for_reassignment(shipment, &snap.shipments, &snap.transporters)
    }

    pub async fn unavailable_transporters(&self, shipment: &Shipment) -> Vec<UnavailableTransporter> {
        let snap = self.snapshot.read().await;
        unavailable_transporters(shipment, &snap.shipments, &snap.transporters)
    }

    pub async fn busy_set(&self) -> Vec<BusyTransporter> {
        crate::domain::busy_set(&self.snapshot.read().await.shipments)
    }

    /// Fresh candidate lists for one shipment
    pub async fn candidates(&self, shipment_id: &str) -> Result<CandidateSet, AssignmentError> {
        let snap = self.refresh().await;
        let shipment = snap
            .shipment(shipment_id)
            .ok_or_else(|| AssignmentError::shipment_not_found(shipment_id))?;
        Ok(CandidateSet::derive(
            shipment,
            &snap.shipments,
            &snap.transporters,
        ))
    }

    /// Submit an assignment; never fails, the outcome carries the message
    pub async fn submit_assignment(
        &self,
        shipment_id: &str,
        transporter_id: &str,
    ) -> AssignmentOutcome {
        match self.authority.get_shipment(shipment_id).await {
            Ok(shipment) if !can_assign(&shipment) => {
                debug!(
                    "Assignment blocked by client policy: {} is {}",
                    shipment.id, shipment.status
                );
                return AssignmentOutcome {
                    success: false,
                    message: format!(
                        "Shipment {} is {} and can no longer be assigned",
                        shipment.id, shipment.status
                    ),
                    shipment: None,
                    error_kind: Some(AssignmentErrorKind::InvalidRequest),
                };
            }
            Ok(_) => {}
            Err(e) => return AssignmentOutcome::failed(&e),
        }

        match self.authority.assign(shipment_id, transporter_id).await {
            Ok(shipment) => {
                self.refresh().await;
                AssignmentOutcome::succeeded(shipment)
            }
            Err(e) => AssignmentOutcome::failed(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthorityConfig;
    use crate::domain::assignment::fixtures::{shipment, transporter};
    use crate::domain::ShipmentStatus;

    fn view_model() -> (Arc<AssignmentAuthority>, AssignmentViewModel) {
        let authority = Arc::new(
            AssignmentAuthority::with_records(
                vec![
                    shipment("SHP-1", "Truck", ShipmentStatus::NotAssigned, None),
                    shipment("SHP-2", "Truck", ShipmentStatus::NotAssigned, None),
                    shipment("SHP-3", "Truck", ShipmentStatus::InTransit, Some("TRN-3")),
                ],
                vec![
                    transporter("TRN-1", "Truck"),
                    transporter("TRN-2", "Truck"),
                    transporter("TRN-3", "Truck"),
                ],
                &AuthorityConfig::default(),
            )
            .unwrap(),
        );
        let vm = AssignmentViewModel::new(authority.clone());
        (authority, vm)
    }

    #[tokio::test]
    async fn test_submit_success_refreshes_read_model() {
        let (_, vm) = view_model();
        let outcome = vm.submit_assignment("SHP-1", "TRN-1").await;
        assert!(outcome.success, "{}", outcome.message);
        assert!(outcome.error_kind.is_none());

        let snap = vm.snapshot().await;
        let shp1 = snap.shipment("SHP-1").unwrap();
        assert_eq!(shp1.transporter_id.as_deref(), Some("TRN-1"));

        let shp2 = snap.shipment("SHP-2").unwrap().clone();
        let ids: Vec<_> = vm
            .compatible_transporters(&shp2)
            .await
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["TRN-2".to_string()]);
    }

    #[tokio::test]
    async fn test_submit_failure_is_reported_not_raised() {
        let (_, vm) = view_model();
        vm.submit_assignment("SHP-1", "TRN-1").await;

        let outcome = vm.submit_assignment("SHP-2", "TRN-1").await;
        assert!(!outcome.success);
        assert_eq!(outcome.error_kind, Some(AssignmentErrorKind::TransporterBusy));
        assert!(outcome.message.contains("SHP-1"));
        assert!(outcome.shipment.is_none());
    }

    #[tokio::test]
    async fn test_client_policy_blocks_locked_shipment() {
        let (authority, vm) = view_model();
        let outcome = vm.submit_assignment("SHP-3", "TRN-1").await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("in-transit"));
        assert_eq!(
            authority
                .get_shipment("SHP-3")
                .await
                .unwrap()
                .transporter_id
                .as_deref(),
            Some("TRN-3")
        );
    }

    #[tokio::test]
    async fn test_candidates_follow_authority_writes() {
        let (authority, vm) = view_model();
        let before = vm.candidates("SHP-2").await.unwrap();
        assert_eq!(before.compatible.len(), 2);
        assert_eq!(before.unavailable.len(), 1);

        authority
            .advance_status("SHP-3", ShipmentStatus::Delivered)
            .await
            .unwrap();
        let after = vm.candidates("SHP-2").await.unwrap();
        assert_eq!(after.compatible.len(), 3);
        assert!(after.unavailable.is_empty());

        assert!(vm.candidates("SHP-404").await.is_err());
    }

    #[tokio::test]
    async fn test_reassignment_choice_excludes_current() {
        let (_, vm) = view_model();
        vm.submit_assignment("SHP-1", "TRN-1").await;
        let shp1 = vm.snapshot().await.shipment("SHP-1").unwrap().clone();

        let choices: Vec<_> = vm
            .available_for_reassignment(&shp1)
            .await
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(choices, vec!["TRN-2".to_string()]);

        let outcome = vm.submit_assignment("SHP-1", "TRN-2").await;
        assert!(outcome.success);
        assert_eq!(vm.busy_set().await.len(), 2);
    }
}
