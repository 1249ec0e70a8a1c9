use crate::config::SimulatorConfig;
use crate::domain::ShipmentStatus;

/// Per-tick progression probabilities for the lifecycle state machine.
///
/// | from         | to          | chance                    |
/// |--------------|-------------|---------------------------|
/// | assigned     | in-transit  | `assigned_to_in_transit`  |
/// | in-transit   | delivered   | `in_transit_to_delivered` |
///
/// Every other state self-loops; delivered and cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTable {
    pub assigned_to_in_transit: f64,
    pub in_transit_to_delivered: f64,
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self {
            assigned_to_in_transit: 0.3,
            in_transit_to_delivered: 0.2,
        }
    }
}

impl TransitionTable {
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self {
            assigned_to_in_transit: config.assigned_to_in_transit,
            in_transit_to_delivered: config.in_transit_to_delivered,
        }
    }

    /// Chance that `status` progresses on one tick
    pub fn progression_probability(&self, status: ShipmentStatus) -> f64 {
        match status {
            ShipmentStatus::Assigned => self.assigned_to_in_transit,
            ShipmentStatus::InTransit => self.in_transit_to_delivered,
            _ => 0.0,
        }
    }

    /// Next status for a uniform draw in `[0, 1)`
    pub fn next_status(&self, status: ShipmentStatus, draw: f64) -> ShipmentStatus {
        match status.progression() {
            Some(next) if draw < self.progression_probability(status) => next,
            _ => status,
        }
    }
}
