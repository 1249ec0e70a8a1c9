//! Derived assignment relationship.
//!
//! A transporter is busy while some shipment binds it in `assigned` or
//! `in-transit`. Nothing here is cached: every check rescans the shipment
//! list it is handed, so the authority and the view-model always agree.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Shipment, ShipmentStatus};

/// One entry of the busy-set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyTransporter {
    pub transporter_id: String,
    pub shipment_id: String,
    pub status: ShipmentStatus,
}

/// Busy transporters keyed by id, mapped to the shipment engaging them.
///
/// `exclude_shipment` drops busy-ness caused by that shipment, so a shipment
/// can always re-select the transporter it already holds.
pub fn busy_transporters<'a>(
    shipments: &'a [Shipment],
    exclude_shipment: Option<&str>,
) -> HashMap<&'a str, &'a Shipment> {
    shipments
        .iter()
        .filter(|s| s.status.engages_transporter())
        .filter(|s| exclude_shipment != Some(s.id.as_str()))
        .filter_map(|s| s.transporter_id.as_deref().map(|t| (t, s)))
        .collect()
}

/// The shipment (other than `shipment_id`) that keeps `transporter_id` busy
pub fn find_conflict<'a>(
    shipments: &'a [Shipment],
    transporter_id: &str,
    shipment_id: &str,
) -> Option<&'a Shipment> {
    shipments
        .iter()
        .find(|s| s.id != shipment_id && s.engages(transporter_id))
}

/// Flattened busy-set, ordered by transporter id
pub fn busy_set(shipments: &[Shipment]) -> Vec<BusyTransporter> {
    let mut out: Vec<BusyTransporter> = busy_transporters(shipments, None)
        .into_iter()
        .map(|(transporter_id, shipment)| BusyTransporter {
            transporter_id: transporter_id.to_string(),
            shipment_id: shipment.id.clone(),
            status: shipment.status,
        })
        .collect();
    out.sort_by(|a, b| a.transporter_id.cmp(&b.transporter_id));
    out
}

/// Every transporter engaged by more than one shipment (should never happen)
pub fn double_bookings(shipments: &[Shipment]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for transporter_id in shipments
        .iter()
        .filter(|s| s.status.engages_transporter())
        .filter_map(|s| s.transporter_id.as_deref())
    {
        *counts.entry(transporter_id).or_default() += 1;
    }
    let mut out: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, _)| id.to_string())
        .collect();
    out.sort();
    out
}


#[cfg(test)]
mod tests {
    use super::fixtures::shipment;
    use super::*;

    #[test]
    fn test_busy_set_counts_only_engaged_states() {
        let shipments = vec![
            shipment("SHP-1", "Truck", ShipmentStatus::Assigned, Some("TRN-1")),
            shipment("SHP-2", "Truck", ShipmentStatus::InTransit, Some("TRN-2")),
            shipment("SHP-3", "Truck", ShipmentStatus::Delivered, Some("TRN-3")),
            shipment("SHP-4", "Truck", ShipmentStatus::Cancelled, None),
            shipment("SHP-5", "Truck", ShipmentStatus::NotAssigned, None),
        ];
        let busy = busy_set(&shipments);
        let ids: Vec<_> = busy.iter().map(|b| b.transporter_id.as_str()).collect();
        assert_eq!(ids, vec!["TRN-1", "TRN-2"]);
    }

    #[test]
    fn test_exclusion_drops_self_caused_busyness() {
        let shipments = vec![shipment(
            "SHP-1",
            "Truck",
            ShipmentStatus::Assigned,
            Some("TRN-1"),
        )];
        assert!(busy_transporters(&shipments, Some("SHP-1")).is_empty());
        assert!(find_conflict(&shipments, "TRN-1", "SHP-1").is_none());
        assert_eq!(
            find_conflict(&shipments, "TRN-1", "SHP-2").map(|s| s.id.as_str()),
            Some("SHP-1")
        );
    }

    #[test]
    fn test_double_bookings_detected() {
        let shipments = vec![
            shipment("SHP-1", "Truck", ShipmentStatus::Assigned, Some("TRN-1")),
            shipment("SHP-2", "Truck", ShipmentStatus::InTransit, Some("TRN-1")),
            shipment("SHP-3", "Truck", ShipmentStatus::Delivered, Some("TRN-2")),
            shipment("SHP-4", "Truck", ShipmentStatus::Assigned, Some("TRN-2")),
        ];
        assert_eq!(double_bookings(&shipments), vec!["TRN-1".to_string()]);
    }
}
