use chrono::Utc;
use shiptrack::{
    authority::Registry,
    config::{AuthorityConfig, SimulatorConfig},
    domain::double_bookings,
    simulator::{ShipmentGateway, StatusSimulator},
    AssignmentAuthority, AssignmentErrorKind, Shipment, ShipmentStatus, Transporter,
};
use std::sync::Arc;
use std::time::Duration;

fn open_shipment(i: usize, vehicle_type: &str) -> Shipment {
    Shipment {
        id: format!("SHP-{:03}", i),
        origin: "Chennai".to_string(),
        destination: "Madurai".to_string(),
        route: "Chennai > Trichy > Madurai".to_string(),
        vehicle_type: vehicle_type.to_string(),
        created_at: Utc::now(),
        status: ShipmentStatus::NotAssigned,
        transporter_id: None,
    }
}

fn transporter(i: usize, vehicle_type: &str) -> Transporter {
    Transporter {
        id: format!("TRN-{:03}", i),
        name: format!("Carrier {}", i),
        email: format!("carrier{}@example.com", i),
        phone: "+91 98200 00000".to_string(),
        vehicle_type: vehicle_type.to_string(),
    }
}

fn vehicle(i: usize) -> &'static str {
    if i % 2 == 0 {
        "Truck"
    } else {
        "Van"
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_assignments_and_ticks_never_double_book() {
    let shipments = (0..24).map(|i| open_shipment(i, vehicle(i))).collect();
    let transporters = (0..6).map(|i| transporter(i, vehicle(i))).collect();
    let authority = Arc::new(
        AssignmentAuthority::with_records(shipments, transporters, &AuthorityConfig::default())
            .expect("valid fixture"),
    );

    let gateway: Arc<dyn ShipmentGateway> = authority.clone();
    let simulator = StatusSimulator::new(
        gateway,
        &SimulatorConfig {
            tick_interval_ms: 1,
            assigned_to_in_transit: 0.5,
            in_transit_to_delivered: 0.5,
            rng_seed: Some(11),
            ..SimulatorConfig::default()
        },
    );
    assert!(simulator.start().await);

    let mut workers = Vec::new();
    for worker in 0..8usize {
        let authority = authority.clone();
        workers.push(tokio::spawn(async move {
            let mut accepted = 0usize;
            for round in 0..60usize {
                let s = (worker * 7 + round) % 24;
                let t = (worker + round * 3) % 6;
                match authority
                    .assign(&format!("SHP-{:03}", s), &format!("TRN-{:03}", t))
                    .await
                {
                    Ok(_) => accepted += 1,
                    Err(e) => assert_ne!(e.kind(), AssignmentErrorKind::NotFound),
                }
                tokio::task::yield_now().await;
            }
            accepted
        }));
    }

    let mut accepted = 0;
    for worker in workers {
        accepted += worker.await.expect("worker panicked");
    }
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(simulator.stop().await);

    assert!(accepted > 0);
    let snapshot = authority.snapshot().await;
    assert!(double_bookings(&snapshot.shipments).is_empty());
    assert!(Registry::from_records(snapshot.shipments, snapshot.transporters).is_ok());
}

#[tokio::test]
async fn simulator_only_moves_shipments_forward() {
    let mut shipments: Vec<Shipment> = (0..4).map(|i| open_shipment(i, "Truck")).collect();
    shipments[0].status = ShipmentStatus::Assigned;
    shipments[0].transporter_id = Some("TRN-000".to_string());
    shipments[1].status = ShipmentStatus::Cancelled;
    shipments[2].status = ShipmentStatus::Delivered;
    shipments[2].transporter_id = Some("TRN-001".to_string());
    let transporters = vec![transporter(0, "Truck"), transporter(1, "Truck")];
    let authority = Arc::new(
        AssignmentAuthority::with_records(shipments, transporters, &AuthorityConfig::default())
            .expect("valid fixture"),
    );
    let mut events = authority.subscribe();

    let gateway: Arc<dyn ShipmentGateway> = authority.clone();
    let simulator = StatusSimulator::new(
        gateway,
        &SimulatorConfig {
            assigned_to_in_transit: 1.0,
            in_transit_to_delivered: 1.0,
            rng_seed: Some(3),
            ..SimulatorConfig::default()
        },
    );
    for _ in 0..200 {
        simulator.tick().await;
    }

    let rank = |s: ShipmentStatus| match s {
        ShipmentStatus::Assigned => 1,
        ShipmentStatus::InTransit => 2,
        ShipmentStatus::Delivered => 3,
        _ => 0,
    };
    while let Ok(event) = events.try_recv() {
        if let shiptrack::ShipmentEvent::StatusChanged { from, to, shipment, .. } = event {
            assert_eq!(shipment.id, "SHP-000");
            assert!(rank(to) > rank(from), "{from} -> {to}");
        }
    }

    let after = authority.snapshot().await;
    assert_eq!(after.shipment("SHP-000").unwrap().status, ShipmentStatus::Delivered);
    assert_eq!(after.shipment("SHP-001").unwrap().status, ShipmentStatus::Cancelled);
    assert_eq!(after.shipment("SHP-002").unwrap().status, ShipmentStatus::Delivered);
    assert_eq!(after.shipment("SHP-003").unwrap().status, ShipmentStatus::NotAssigned);
}
