use crate::config::SupervisorConfig;
use crate::pm2::ServiceManager;
use crate::scan::{ProcessTerminator, SnapshotProvider};
use crate::supervisor::classify::Classifier;
use crate::supervisor::health::{evaluate, Verdict};
use crate::supervisor::reconcile::reconcile;
use crate::supervisor::restart::{restart_managed_app, RestartMethod};
use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{info, warn};

/// How a restart attempt ended, kept only for this cycle's report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RestartReport {
    Succeeded { method: RestartMethod },
    Failed { diagnostic: String },
}

/// Structured summary of one supervision pass
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// Managed-app instances found in the snapshot
    pub managed_count: usize,
    /// Worker-binary candidates before duplicate eviction
    pub workers_before: usize,
    /// Worker survivors after duplicate eviction
    pub worker_survivors: usize,
    /// PIDs evicted during reconciliation
    pub terminated_pids: Vec<u32>,
    /// Verdict computed from post-reconciliation counts
    pub verdict: Verdict,
    /// Restart outcome, present only when the verdict required one
    pub restart: Option<RestartReport>,
    /// When the cycle finished
    pub completed_at: DateTime<Local>,
}

impl CycleReport {
    /// Whether this cycle left the topology in (or restored it to) a state
    /// that needs no further attention until the next tick
    pub fn is_settled(&self) -> bool {
        match &self.restart {
            None => self.verdict == Verdict::Healthy,
            Some(RestartReport::Succeeded { .. }) => true,
            Some(RestartReport::Failed { .. }) => false,
        }
    }
}

/// Run one full supervision pass: snapshot, classify, reconcile, evaluate,
/// and restart if the topology calls for it.
///
/// Never fails: fatal restart outcomes are folded into the report, and the
/// next externally driven invocation is the retry. All state is recomputed
/// from the snapshot; nothing carries over between calls.
pub async fn run_supervision_cycle<S, T, M>(
    config: &SupervisorConfig,
    scanner: &mut S,
    terminator: &T,
    manager: &M,
) -> CycleReport
where
    S: SnapshotProvider,
    T: ProcessTerminator,
    M: ServiceManager,
{
    let snapshot = scanner.snapshot();
    let classified = Classifier::new(config).classify(&snapshot);

    let managed_count = classified.managed.len();
    let workers_before = classified.workers.len();

    let reconciled = reconcile(classified.workers, terminator);
    let worker_survivors = reconciled.survivors.len();
    let terminated_pids: Vec<u32> = reconciled.terminated.iter().map(|r| r.pid).collect();

    let verdict = evaluate(managed_count, worker_survivors);
    info!(
        "Cycle: {} managed, {} workers ({} evicted), verdict: {}",
        managed_count,
        worker_survivors,
        terminated_pids.len(),
        verdict
    );

    let restart = match verdict {
        Verdict::Healthy => None,
        Verdict::NeedsRestart => Some(match restart_managed_app(config, manager).await {
            Ok(method) => RestartReport::Succeeded { method },
            Err(e) => {
                warn!("Restart of '{}' failed: {}", config.service_name, e);
                RestartReport::Failed {
                    diagnostic: e.to_string(),
                }
            }
        }),
    };

    CycleReport {
        managed_count,
        workers_before,
        worker_survivors,
        terminated_pids,
        verdict,
        restart,
        completed_at: Local::now(),
    }
}
