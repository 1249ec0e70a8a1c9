use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::SimulatorConfig;
use crate::domain::{ShipmentStatus, StatusTransition};

use super::gateway::ShipmentGateway;
use super::transition::TransitionTable;

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No shipments to pick from
    Idle,
    /// Picked shipment stays in its state this tick
    Unchanged {
        shipment_id: String,
        status: ShipmentStatus,
    },
    /// Picked shipment moved on and the authority accepted it
    Advanced(TickTransition),
    /// Listing or persisting failed; the next tick runs regardless
    Failed {
        shipment_id: Option<String>,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickTransition {
    pub shipment_id: String,
    pub from: ShipmentStatus,
    pub to: ShipmentStatus,
}

/// Counters exposed for monitoring
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorStats {
    pub running: bool,
    pub interval_ms: u64,
    pub ticks: u64,
    pub transitions: u64,
    pub failures: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_transition: Option<StatusTransition>,
}

struct RunningTask {
    handle: JoinHandle<()>,
    shutdown_tx: oneshot::Sender<()>,
}

struct SimulatorCore {
    gateway: Arc<dyn ShipmentGateway>,
    table: TransitionTable,
    rng: Mutex<StdRng>,
    stats: RwLock<SimulatorStats>,
}

impl SimulatorCore {
    async fn tick(&self) -> TickOutcome {
        let outcome = self.run_tick().await;

        let mut stats = self.stats.write().await;
        stats.ticks += 1;
        stats.last_tick_at = Some(Utc::now());
        match &outcome {
            TickOutcome::Advanced(t) => {
                stats.transitions += 1;
                stats.last_transition = Some(StatusTransition::new(&t.shipment_id, t.from, t.to));
            }
            TickOutcome::Failed { .. } => stats.failures += 1,
            TickOutcome::Idle | TickOutcome::Unchanged { .. } => {}
        }

        outcome
    }

    async fn run_tick(&self) -> TickOutcome {
        let shipments = match self.gateway.list_shipments().await {
            Ok(shipments) => shipments,
            Err(e) => {
                warn!("Status simulator could not list shipments: {}", e);
                return TickOutcome::Failed {
                    shipment_id: None,
                    error: e.to_string(),
                };
            }
        };

        if shipments.is_empty() {
            debug!("Status simulator tick: no shipments");
            return TickOutcome::Idle;
        }

        let (index, draw) = {
            let mut rng = self.rng.lock().await;
            (rng.gen_range(0..shipments.len()), rng.gen::<f64>())
        };
        let picked = &shipments[index];
        let next = self.table.next_status(picked.status, draw);

        if next == picked.status {
            debug!(
                "Status simulator tick: {} stays {}",
                picked.id, picked.status
            );
            return TickOutcome::Unchanged {
                shipment_id: picked.id.clone(),
                status: picked.status,
            };
        }

        match self.gateway.advance_status(&picked.id, next).await {
            Ok(updated) => {
                info!(
                    "Status simulator moved {} from {} to {}",
                    updated.id, picked.status, updated.status
                );
                TickOutcome::Advanced(TickTransition {
                    shipment_id: updated.id,
                    from: picked.status,
                    to: updated.status,
                })
            }
            Err(e) => {
                warn!(
                    "Status simulator failed to move {} to {}: {}",
                    picked.id, next, e
                );
                TickOutcome::Failed {
                    shipment_id: Some(picked.id.clone()),
                    error: e.to_string(),
                }
            }
        }
    }

    async fn run(self: Arc<Self>, period: Duration, mut shutdown_rx: oneshot::Receiver<()>) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; updates start one period in
        interval.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
        debug!("Status simulator loop exited");
    }
}

/// Background process advancing one random shipment per period through the
/// lifecycle state machine.
///
/// `start` and `stop` are idempotent and at most one timer task exists at a
/// time. Stopping cancels future ticks; a tick already persisting a status is
/// allowed to finish.
pub struct StatusSimulator {
    core: Arc<SimulatorCore>,
    period: Duration,
    task: Mutex<Option<RunningTask>>,
}

impl StatusSimulator {
    pub fn new(gateway: Arc<dyn ShipmentGateway>, config: &SimulatorConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let period = Duration::from_millis(config.tick_interval_ms.max(1));

        Self {
            core: Arc::new(SimulatorCore {
                gateway,
                table: TransitionTable::from_config(config),
                rng: Mutex::new(rng),
                stats: RwLock::new(SimulatorStats {
                    interval_ms: period.as_millis() as u64,
                    ..SimulatorStats::default()
                }),
            }),
            period,
            task: Mutex::new(None),
        }
    }

    /// Start periodic updates. Returns `false` if already running.
    pub async fn start(&self) -> bool {
        let mut slot = self.task.lock().await;
        if slot.as_ref().is_some_and(|t| !t.handle.is_finished()) {
            debug!("Status simulator already running");
            return false;
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let core = Arc::clone(&self.core);
        let handle = tokio::spawn(core.run(self.period, shutdown_rx));
        *slot = Some(RunningTask {
            handle,
            shutdown_tx,
        });
        self.core.stats.write().await.running = true;

        info!(
            "Status simulator started (every {} ms)",
            self.period.as_millis()
        );
        true
    }

    /// Stop periodic updates. Returns `false` if it was not running.
    pub async fn stop(&self) -> bool {
        let mut slot = self.task.lock().await;
        let Some(task) = slot.take() else {
            debug!("Status simulator already stopped");
            return false;
        };

        let _ = task.shutdown_tx.send(());
        if let Err(e) = task.handle.await {
            warn!("Status simulator task ended abnormally: {}", e);
        }
        self.core.stats.write().await.running = false;

        info!("Status simulator stopped");
        true
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|t| !t.handle.is_finished())
    }

    /// Run one tick immediately, independent of the timer
    pub async fn tick(&self) -> TickOutcome {
        self.core.tick().await
    }

    pub async fn stats(&self) -> SimulatorStats {
        let mut stats = self.core.stats.read().await.clone();
        stats.running = self.is_running().await;
        stats
    }
}
