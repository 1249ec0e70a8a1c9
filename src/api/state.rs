use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::authority::AssignmentAuthority;
use crate::simulator::StatusSimulator;
use crate::viewmodel::AssignmentViewModel;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Single writer for shipments and transporters
    pub authority: Arc<AssignmentAuthority>,

    /// Candidate derivation for assignment screens
    pub view_model: Arc<AssignmentViewModel>,

    /// Background status progression
    pub simulator: Arc<StatusSimulator>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(authority: Arc<AssignmentAuthority>, simulator: Arc<StatusSimulator>) -> Self {
        let view_model = Arc::new(AssignmentViewModel::new(authority.clone()));
        Self {
            authority,
            view_model,
            simulator,
            start_time: Utc::now(),
        }
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
