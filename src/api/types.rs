use serde::{Deserialize, Serialize};

use crate::error::AssignmentErrorKind;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub shipments: usize,
    pub transporters: usize,
    pub simulator_running: bool,
    pub uptime_secs: i64,
}

/// Body of PUT /api/shipments/:id/assign
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub transporter_id: Option<String>,
}

/// Body of PATCH /api/shipments/:id/status
#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: AssignmentErrorKind,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorControlResponse {
    pub success: bool,
    pub running: bool,
    pub message: String,
}
