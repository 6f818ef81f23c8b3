use serde::Serialize;

/// Whether the process topology matches the expected healthy shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Healthy,
    NeedsRestart,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Healthy => write!(f, "healthy"),
            Verdict::NeedsRestart => write!(f, "needs restart"),
        }
    }
}

/// Evaluate topology health from post-reconciliation counts.
///
/// Healthy means exactly one managed-app instance and a worker count of
/// exactly 2, or in 3..=5. The band is two-tiered on purpose; do not collapse
/// it into a single range. Counts above 5 trigger a restart by falling
/// through, the same as zero.
pub fn evaluate(managed_count: usize, worker_survivor_count: usize) -> Verdict {
    let workers_ok = worker_survivor_count == 2
        || (worker_survivor_count > 2 && worker_survivor_count <= 5);

    if managed_count == 1 && workers_ok {
        Verdict::Healthy
    } else {
        Verdict::NeedsRestart
    }
}
