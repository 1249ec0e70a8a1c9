use axum::{extract::State, Json};
use tracing::info;

use crate::api::{
    state::AppState,
    types::{HealthResponse, SimulatorControlResponse},
};
use crate::simulator::SimulatorStats;

/// GET /health -- lightweight liveness probe
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.authority.snapshot().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        shipments: snapshot.shipments.len(),
        transporters: snapshot.transporters.len(),
        simulator_running: state.simulator.is_running().await,
        uptime_secs: state.uptime_seconds(),
    })
}

/// GET /api/simulator
pub async fn get_simulator(State(state): State<AppState>) -> Json<SimulatorStats> {
    Json(state.simulator.stats().await)
}

/// POST /api/simulator/start
pub async fn start_simulator(State(state): State<AppState>) -> Json<SimulatorControlResponse> {
    let started = state.simulator.start().await;
    if started {
        info!("Simulator started via API");
    }
    Json(SimulatorControlResponse {
        success: true,
        running: true,
        message: if started {
            "Simulator started".to_string()
        } else {
            "Simulator already running".to_string()
        },
    })
}

/// POST /api/simulator/stop
pub async fn stop_simulator(State(state): State<AppState>) -> Json<SimulatorControlResponse> {
    let stopped = state.simulator.stop().await;
    if stopped {
        info!("Simulator stopped via API");
    }
    Json(SimulatorControlResponse {
        success: true,
        running: false,
        message: if stopped {
            "Simulator stopped".to_string()
        } else {
            "Simulator was not running".to_string()
        },
    })
}
