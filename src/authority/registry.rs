//! In-memory shipment/transporter records and the write rules applied to them.
//!
//! `Registry` is synchronous. The authority holds it behind a single lock and
//! runs each validate-then-mutate call to completion under that lock.

use serde::{Deserialize, Serialize};

use crate::domain::{
    double_bookings, find_conflict, NewShipment, NewTransporter, Shipment, ShipmentStatus,
    Transporter,
};
use crate::error::AssignmentError;

/// Consistent copy of every record, taken under one read lock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub shipments: Vec<Shipment>,
    pub transporters: Vec<Transporter>,
}

impl RegistrySnapshot {
    pub fn shipment(&self, id: &str) -> Option<&Shipment> {
        self.shipments.iter().find(|s| s.id == id)
    }

    pub fn transporter(&self, id: &str) -> Option<&Transporter> {
        self.transporters.iter().find(|t| t.id == id)
    }
}

/// Result of a committed assignment
#[derive(Debug, Clone)]
pub struct Assignment {
    pub shipment: Shipment,
    pub previous_transporter: Option<String>,
}

/// Result of a committed status overwrite
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub shipment: Shipment,
    pub from: ShipmentStatus,
}

#[derive(Debug, Default)]
pub struct Registry {
    shipments: Vec<Shipment>,
    transporters: Vec<Transporter>,
}

impl Registry {
    /// Build from existing records, refusing any set that breaks the data model
    pub fn from_records(
        shipments: Vec<Shipment>,
        transporters: Vec<Transporter>,
    ) -> std::result::Result<Self, String> {
        let registry = Self {
            shipments,
            transporters,
        };
        registry.check_invariants()?;
        Ok(registry)
    }

    /// Every data-model invariant, as one error listing the first violation
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (i, s) in self.shipments.iter().enumerate() {
            if self.shipments[..i].iter().any(|other| other.id == s.id) {
                return Err(format!("duplicate shipment id {}", s.id));
            }
            if let Some(violation) = s.binding_violation() {
                return Err(violation);
            }
            if let Some(t) = s.transporter_id.as_deref() {
                if self.transporter(t).is_none() {
                    return Err(format!(
                        "shipment {} references unknown transporter {}",
                        s.id, t
                    ));
                }
            }
        }
        for (i, t) in self.transporters.iter().enumerate() {
            if self.transporters[..i].iter().any(|other| other.id == t.id) {
                return Err(format!("duplicate transporter id {}", t.id));
            }
        }
        let doubled = double_bookings(&self.shipments);
        if !doubled.is_empty() {
            return Err(format!(
                "transporters engaged by more than one shipment: {}",
                doubled.join(", ")
            ));
        }
        Ok(())
    }

    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    pub fn transporters(&self) -> &[Transporter] {
        &self.transporters
    }

    pub fn shipment(&self, id: &str) -> Option<&Shipment> {
        self.shipments.iter().find(|s| s.id == id)
    }

    pub fn transporter(&self, id: &str) -> Option<&Transporter> {
        self.transporters.iter().find(|t| t.id == id)
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            shipments: self.shipments.clone(),
            transporters: self.transporters.clone(),
        }
    }

    fn shipment_index(&self, id: &str) -> Result<usize, AssignmentError> {
        self.shipments
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| AssignmentError::shipment_not_found(id))
    }

    /// Bind `transporter_id` to `shipment_id`. Checks run in a fixed order and
    /// the first failure wins; nothing is mutated unless every check passes.
    pub fn assign(
        &mut self,
        shipment_id: &str,
        transporter_id: &str,
        enforce_status_lock: bool,
    ) -> Result<Assignment, AssignmentError> {
        let idx = self.shipment_index(shipment_id)?;

        let transporter_id = transporter_id.trim();
        if transporter_id.is_empty() {
            return Err(AssignmentError::InvalidRequest(
                "transporterId is required".to_string(),
            ));
        }

        let transporter = self
            .transporter(transporter_id)
            .ok_or_else(|| AssignmentError::transporter_not_found(transporter_id))?;

        let shipment = &self.shipments[idx];
        if !transporter.can_carry(&shipment.vehicle_type) {
            return Err(AssignmentError::VehicleTypeMismatch {
                required: shipment.vehicle_type.clone(),
                supplied: transporter.vehicle_type.clone(),
            });
        }

        if let Some(conflict) = find_conflict(&self.shipments, transporter_id, shipment_id) {
            return Err(AssignmentError::TransporterBusy {
                transporter_id: transporter_id.to_string(),
                shipment_id: conflict.id.clone(),
                status: conflict.status,
            });
        }

        if enforce_status_lock && !shipment.status.accepts_assignment() {
            return Err(AssignmentError::InvalidRequest(format!(
                "shipment {} is {}; assignment is locked",
                shipment.id, shipment.status
            )));
        }

        let shipment = &mut self.shipments[idx];
        let previous_transporter = shipment
            .transporter_id
            .replace(transporter_id.to_string())
            .filter(|prev| prev != transporter_id);
        shipment.status = ShipmentStatus::Assigned;

        Ok(Assignment {
            shipment: shipment.clone(),
            previous_transporter,
        })
    }

    /// Overwrite the status of `shipment_id`.
    ///
    /// The lifecycle table is not consulted; only the status/binding invariants
    /// and the busy-set are.
    pub fn set_status(
        &mut self,
        shipment_id: &str,
        status: ShipmentStatus,
    ) -> Result<StatusChange, AssignmentError> {
        let idx = self.shipment_index(shipment_id)?;
        let current = &self.shipments[idx];

        if status.requires_transporter() {
            let Some(transporter_id) = current.transporter_id.as_deref() else {
                return Err(AssignmentError::InvalidRequest(format!(
                    "shipment {} has no transporter and cannot become {}",
                    shipment_id, status
                )));
            };
            if status.engages_transporter() {
                if let Some(conflict) = find_conflict(&self.shipments, transporter_id, shipment_id)
                {
                    return Err(AssignmentError::TransporterBusy {
                        transporter_id: transporter_id.to_string(),
                        shipment_id: conflict.id.clone(),
                        status: conflict.status,
                    });
                }
            }
        }

        let shipment = &mut self.shipments[idx];
        let from = shipment.status;
        shipment.status = status;
        if matches!(
            status,
            ShipmentStatus::NotAssigned | ShipmentStatus::Cancelled
        ) {
            shipment.transporter_id = None;
        }

        Ok(StatusChange {
            shipment: shipment.clone(),
            from,
        })
    }

    pub fn insert_shipment(&mut self, request: &NewShipment) -> Result<Shipment, AssignmentError> {
        if let Some(field) = request.missing_field() {
            return Err(AssignmentError::InvalidRequest(format!("{} is required", field)));
        }
        let shipment = Shipment::from_request(request);
        self.shipments.push(shipment.clone());
        Ok(shipment)
    }

    pub fn insert_transporter(
        &mut self,
        request: &NewTransporter,
    ) -> Result<Transporter, AssignmentError> {
        if let Some(field) = request.missing_field() {
            return Err(AssignmentError::InvalidRequest(format!("{} is required", field)));
        }
        let transporter = Transporter::from_request(request);
        self.transporters.push(transporter.clone());
        Ok(transporter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assignment::fixtures::{shipment, transporter};
    use crate::error::AssignmentErrorKind;

    fn registry() -> Registry {
        Registry::from_records(
            vec![
                shipment("SHP-1", "Truck", ShipmentStatus::NotAssigned, None),
                shipment("SHP-2", "Truck", ShipmentStatus::NotAssigned, None),
                shipment("SHP-3", "Van", ShipmentStatus::NotAssigned, None),
            ],
            vec![
                transporter("TRN-1", "Truck"),
                transporter("TRN-2", "Truck"),
                transporter("TRN-3", "Van"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_assign_binds_and_sets_assigned() {
        let mut reg = registry();
        let result = reg.assign("SHP-1", "TRN-1", true).unwrap();
        assert_eq!(result.shipment.status, ShipmentStatus::Assigned);
        assert_eq!(result.shipment.transporter_id.as_deref(), Some("TRN-1"));
        assert!(result.previous_transporter.is_none());
    }

    #[test]
    fn test_check_order_first_failure_wins() {
        let mut reg = registry();
        // Unknown shipment beats a blank transporter id
        let err = reg.assign("SHP-404", "", true).unwrap_err();
        assert_eq!(err.kind(), AssignmentErrorKind::NotFound);

        let err = reg.assign("SHP-1", "   ", true).unwrap_err();
        assert_eq!(err.kind(), AssignmentErrorKind::InvalidRequest);

        let err = reg.assign("SHP-1", "TRN-404", true).unwrap_err();
        assert_eq!(err, AssignmentError::transporter_not_found("TRN-404"));

        // Mismatch is reported before busy-ness
        reg.assign("SHP-3", "TRN-3", true).unwrap();
        let err = reg.assign("SHP-1", "TRN-3", true).unwrap_err();
        assert_eq!(err.kind(), AssignmentErrorKind::VehicleTypeMismatch);
    }

    #[test]
    fn test_busy_transporter_rejected_without_mutation() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        let before = reg.snapshot();

        let err = reg.assign("SHP-2", "TRN-1", true).unwrap_err();
        assert_eq!(
            err,
            AssignmentError::TransporterBusy {
                transporter_id: "TRN-1".into(),
                shipment_id: "SHP-1".into(),
                status: ShipmentStatus::Assigned,
            }
        );
        assert_eq!(reg.snapshot(), before);
    }

    #[test]
    fn test_reassignment_frees_previous_transporter() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        let result = reg.assign("SHP-1", "TRN-2", true).unwrap();
        assert_eq!(result.previous_transporter.as_deref(), Some("TRN-1"));
        assert_eq!(result.shipment.status, ShipmentStatus::Assigned);

        // TRN-1 is immediately free for another shipment
        let other = reg.assign("SHP-2", "TRN-1", true).unwrap();
        assert_eq!(other.shipment.transporter_id.as_deref(), Some("TRN-1"));
    }

    #[test]
    fn test_reassigning_same_transporter_is_accepted() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        let result = reg.assign("SHP-1", "TRN-1", true).unwrap();
        assert!(result.previous_transporter.is_none());
    }

    #[test]
    fn test_status_lock_is_configurable() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        reg.set_status("SHP-1", ShipmentStatus::InTransit).unwrap();

        let err = reg.assign("SHP-1", "TRN-2", true).unwrap_err();
        assert_eq!(err.kind(), AssignmentErrorKind::InvalidRequest);
        assert!(err.to_string().contains("locked"));

        let result = reg.assign("SHP-1", "TRN-2", false).unwrap();
        assert_eq!(result.shipment.status, ShipmentStatus::Assigned);
    }

    #[test]
    fn test_delivered_shipment_frees_transporter() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        reg.set_status("SHP-1", ShipmentStatus::InTransit).unwrap();
        reg.set_status("SHP-1", ShipmentStatus::Delivered).unwrap();

        let delivered = reg.shipment("SHP-1").unwrap();
        assert_eq!(delivered.transporter_id.as_deref(), Some("TRN-1"));
        assert!(reg.assign("SHP-2", "TRN-1", true).is_ok());
    }

    #[test]
    fn test_cancel_clears_binding() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        let change = reg.set_status("SHP-1", ShipmentStatus::Cancelled).unwrap();
        assert_eq!(change.from, ShipmentStatus::Assigned);
        assert!(change.shipment.transporter_id.is_none());
        assert!(reg.assign("SHP-2", "TRN-1", true).is_ok());
    }

    #[test]
    fn test_reset_to_not_assigned_releases_transporter() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        let change = reg
            .set_status("SHP-1", ShipmentStatus::NotAssigned)
            .unwrap();
        assert_eq!(change.from, ShipmentStatus::Assigned);
        assert!(change.shipment.transporter_id.is_none());

        let stored = reg.shipment("SHP-1").unwrap();
        assert!(stored.transporter_id.is_none());
        assert!(stored.binding_violation().is_none());
        assert!(reg.assign("SHP-2", "TRN-1", true).is_ok());
    }

    #[test]
    fn test_set_status_cannot_engage_without_transporter() {
        let mut reg = registry();
        let err = reg
            .set_status("SHP-1", ShipmentStatus::InTransit)
            .unwrap_err();
        assert_eq!(err.kind(), AssignmentErrorKind::InvalidRequest);
        assert_eq!(
            reg.shipment("SHP-1").unwrap().status,
            ShipmentStatus::NotAssigned
        );
    }

    #[test]
    fn test_set_status_cannot_reengage_a_rebooked_transporter() {
        let mut reg = registry();
        reg.assign("SHP-1", "TRN-1", true).unwrap();
        reg.set_status("SHP-1", ShipmentStatus::Delivered).unwrap();
        reg.assign("SHP-2", "TRN-1", true).unwrap();

        let err = reg
            .set_status("SHP-1", ShipmentStatus::InTransit)
            .unwrap_err();
        assert_eq!(err.kind(), AssignmentErrorKind::TransporterBusy);
        assert!(double_bookings(reg.shipments()).is_empty());
    }

    #[test]
    fn test_from_records_rejects_double_booking() {
        let err = Registry::from_records(
            vec![
                shipment("SHP-1", "Truck", ShipmentStatus::Assigned, Some("TRN-1")),
                shipment("SHP-2", "Truck", ShipmentStatus::InTransit, Some("TRN-1")),
            ],
            vec![transporter("TRN-1", "Truck")],
        )
        .unwrap_err();
        assert!(err.contains("TRN-1"));
    }

    #[test]
    fn test_from_records_rejects_dangling_transporter() {
        let err = Registry::from_records(
            vec![shipment(
                "SHP-1",
                "Truck",
                ShipmentStatus::Assigned,
                Some("TRN-9"),
            )],
            vec![],
        )
        .unwrap_err();
        assert!(err.contains("unknown transporter TRN-9"));
    }

    #[test]
    fn test_insert_shipment_requires_fields() {
        let mut reg = registry();
        let err = reg
            .insert_shipment(&NewShipment {
                origin: "Oslo".into(),
                destination: "".into(),
                route: "E6".into(),
                vehicle_type: "Truck".into(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            AssignmentError::InvalidRequest("destination is required".into())
        );
        assert_eq!(reg.shipments().len(), 3);
    }
}
