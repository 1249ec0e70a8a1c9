//! Seed records for a fresh authority: built-in demo data or a JSON fixture.

use chrono::{Duration, Utc};
use std::path::Path;
use tracing::info;

use crate::authority::{AssignmentAuthority, RegistrySnapshot};
use crate::config::AppConfig;
use crate::domain::{Shipment, ShipmentStatus, Transporter};
use crate::error::{Result, ShiptrackError};

/// Built-in demo fleet and shipments
pub fn demo_records() -> RegistrySnapshot {
    let now = Utc::now();
    let shipment = |id: &str,
                    origin: &str,
                    destination: &str,
                    route: &str,
                    vehicle_type: &str,
                    age_hours: i64,
                    status: ShipmentStatus,
                    transporter_id: Option<&str>| Shipment {
        id: id.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        route: route.to_string(),
        vehicle_type: vehicle_type.to_string(),
        created_at: now - Duration::hours(age_hours),
        status,
        transporter_id: transporter_id.map(str::to_string),
    };
    let transporter = |id: &str, name: &str, email: &str, phone: &str, vehicle_type: &str| {
        Transporter {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            vehicle_type: vehicle_type.to_string(),
        }
    };

    RegistrySnapshot {
        shipments: vec![
            shipment(
                "SHP-001",
                "Mumbai",
                "Pune",
                "Mumbai > Lonavala > Pune",
                "Truck",
                72,
                ShipmentStatus::Assigned,
                Some("TRN-001"),
            ),
            shipment(
                "SHP-002",
                "Delhi",
                "Jaipur",
                "Delhi > Gurugram > Jaipur",
                "Van",
                48,
                ShipmentStatus::InTransit,
                Some("TRN-002"),
            ),
            shipment(
                "SHP-003",
                "Bengaluru",
                "Chennai",
                "Bengaluru > Vellore > Chennai",
                "Truck",
                30,
                ShipmentStatus::NotAssigned,
                None,
            ),
            shipment(
                "SHP-004",
                "Kolkata",
                "Bhubaneswar",
                "Kolkata > Kharagpur > Bhubaneswar",
                "Container Truck",
                20,
                ShipmentStatus::NotAssigned,
                None,
            ),
            shipment(
                "SHP-005",
                "Hyderabad",
                "Vijayawada",
                "Hyderabad > Suryapet > Vijayawada",
                "Van",
                96,
                ShipmentStatus::Delivered,
                Some("TRN-004"),
            ),
            shipment(
                "SHP-006",
                "Ahmedabad",
                "Surat",
                "Ahmedabad > Vadodara > Surat",
                "Truck",
                12,
                ShipmentStatus::Cancelled,
                None,
            ),
        ],
        transporters: vec![
            transporter(
                "TRN-001",
                "Swift Logistics",
                "dispatch@swiftlogistics.example",
                "+91 98200 11001",
                "Truck",
            ),
            transporter(
                "TRN-002",
                "Metro Movers",
                "ops@metromovers.example",
                "+91 98200 11002",
                "Van",
            ),
            transporter(
                "TRN-003",
                "Highway Haulers",
                "contact@highwayhaulers.example",
                "+91 98200 11003",
                "Truck",
            ),
            transporter(
                "TRN-004",
                "City Express",
                "hello@cityexpress.example",
                "+91 98200 11004",
                "Van",
            ),
            transporter(
                "TRN-005",
                "Coastal Freight",
                "bookings@coastalfreight.example",
                "+91 98200 11005",
                "Container Truck",
            ),
        ],
    }
}

/// Read a `{ "shipments": [...], "transporters": [...] }` fixture
pub fn load_fixture(path: &Path) -> Result<RegistrySnapshot> {
    let raw = std::fs::read_to_string(path)?;
    let records: RegistrySnapshot = serde_json::from_str(&raw)?;
    Ok(records)
}

/// Authority seeded per config (fixture file if set, demo data otherwise)
pub fn build_authority(config: &AppConfig) -> Result<AssignmentAuthority> {
    let records = match config.seed.path.as_deref() {
        Some(path) => {
            info!("Loading seed fixture from {}", path.display());
            load_fixture(path)?
        }
        None => demo_records(),
    };
    info!(
        "Seeding authority with {} shipments and {} transporters",
        records.shipments.len(),
        records.transporters.len()
    );
    AssignmentAuthority::with_records(records.shipments, records.transporters, &config.authority)
        .map_err(|e| match e {
            ShiptrackError::Validation(msg) => {
                ShiptrackError::Validation(format!("invalid seed data: {}", msg))
            }
            other => other,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::Registry;

    #[test]
    fn test_demo_records_satisfy_invariants() {
        let records = demo_records();
        assert!(Registry::from_records(records.shipments, records.transporters).is_ok());
    }

    #[test]
    fn test_load_fixture_round_trips_demo() {
        let dir = std::env::temp_dir().join(format!("shiptrack-seed-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("seed.json");
        std::fs::write(&path, serde_json::to_vec(&demo_records()).unwrap()).unwrap();

        let loaded = tokio_test::assert_ok!(load_fixture(&path));
        assert_eq!(loaded.shipments.len(), 6);
        assert_eq!(loaded.transporter("TRN-005").unwrap().vehicle_type, "Container Truck");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_build_authority_rejects_broken_fixture() {
        let dir = std::env::temp_dir().join(format!("shiptrack-seed-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("seed.json");
        std::fs::write(
            &path,
            r#"{"shipments":[{"id":"SHP-1","origin":"A","destination":"B","route":"A > B",
                "vehicleType":"Truck","createdAt":"2024-05-01T08:00:00Z","status":"in-transit"}],
               "transporters":[]}"#,
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.seed.path = Some(path);
        let err = build_authority(&config).err().unwrap();
        assert!(err.to_string().contains("invalid seed data"), "{err}");
        std::fs::remove_dir_all(&dir).ok();
    }
}
