//! Candidate-transporter derivation for a single shipment.
//!
//! Pure functions over a shipment list and a transporter list. Busy-ness
//! comes from [`crate::domain::busy_transporters`], the same rule the
//! authority enforces, with the shipment's own binding excluded.

use serde::Serialize;

use crate::domain::{busy_transporters, Shipment, ShipmentStatus, Transporter};

/// Transporter that matches the vehicle type but is engaged elsewhere
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableTransporter {
    #[serde(flatten)]
    pub transporter: Transporter,
    pub busy_with: String,
    pub busy_status: ShipmentStatus,
}

/// Client-side policy: only not-assigned and assigned shipments take a transporter
pub fn can_assign(shipment: &Shipment) -> bool {
    shipment.status.accepts_assignment()
}

/// Same vehicle type and not busy with any other shipment
pub fn compatible_transporters(
    shipment: &Shipment,
    shipments: &[Shipment],
    transporters: &[Transporter],
) -> Vec<Transporter> {
    let busy = busy_transporters(shipments, Some(&shipment.id));
    transporters
        .iter()
        .filter(|t| t.can_carry(&shipment.vehicle_type))
        .filter(|t| !busy.contains_key(t.id.as_str()))
        .cloned()
        .collect()
}

/// Compatible transporters other than the one already bound
pub fn available_for_reassignment(
    shipment: &Shipment,
    shipments: &[Shipment],
    transporters: &[Transporter],
) -> Vec<Transporter> {
    let current = shipment.transporter_id.as_deref();
    compatible_transporters(shipment, shipments, transporters)
        .into_iter()
        .filter(|t| Some(t.id.as_str()) != current)
        .collect()
}

/// Same vehicle type but currently busy (informational)
pub fn unavailable_transporters(
    shipment: &Shipment,
    shipments: &[Shipment],
    transporters: &[Transporter],
) -> Vec<UnavailableTransporter> {
    let busy = busy_transporters(shipments, Some(&shipment.id));
    transporters
        .iter()
        .filter(|t| t.can_carry(&shipment.vehicle_type))
        .filter_map(|t| {
            busy.get(t.id.as_str()).map(|engaged| UnavailableTransporter {
                transporter: t.clone(),
                busy_with: engaged.id.clone(),
                busy_status: engaged.status,
            })
        })
        .collect()
}

/// Everything a caller needs to render an assignment choice
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSet {
    pub shipment_id: String,
    pub status: ShipmentStatus,
    pub can_assign: bool,
    pub current_transporter: Option<String>,
    pub compatible: Vec<Transporter>,
    pub available_for_reassignment: Vec<Transporter>,
    pub unavailable: Vec<UnavailableTransporter>,
}

impl CandidateSet {
    pub fn derive(shipment: &Shipment, shipments: &[Shipment], transporters: &[Transporter]) -> Self {
        Self {
            shipment_id: shipment.id.clone(),
            status: shipment.status,
            can_assign: can_assign(shipment),
            current_transporter: shipment.transporter_id.clone(),
            compatible: compatible_transporters(shipment, shipments, transporters),
            available_for_reassignment: available_for_reassignment(
                shipment,
                shipments,
                transporters,
            ),
            unavailable: unavailable_transporters(shipment, shipments, transporters),
        }
    }
}
