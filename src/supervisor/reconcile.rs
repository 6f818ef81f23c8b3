use crate::scan::{ProcessRecord, ProcessTerminator};
use tracing::{debug, info};

/// Outcome of one duplicate-eviction pass over the worker set
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// Exactly one record per distinct worker name
    pub survivors: Vec<ProcessRecord>,
    /// Records that were sent a terminate signal
    pub terminated: Vec<ProcessRecord>,
}

/// Keep one instance per distinct worker name, terminating the rest.
///
/// Within each name group the record with the greatest start time survives.
/// Ties on start time are broken by input order: the record encountered first
/// is treated as the elder and evicted. Termination is issued immediately and
/// is best-effort; a failed signal never fails the pass.
pub fn reconcile<T: ProcessTerminator>(
    workers: Vec<ProcessRecord>,
    terminator: &T,
) -> Reconciled {
    let mut survivors: Vec<ProcessRecord> = Vec::new();
    let mut terminated: Vec<ProcessRecord> = Vec::new();

    for record in workers {
        match survivors.iter().position(|s| s.name == record.name) {
            None => survivors.push(record),
            Some(i) => {
                // `>=` makes the later-scanned record win ties, evicting the
                // first-encountered elder.
                let evicted = if record.started_at_secs >= survivors[i].started_at_secs {
                    std::mem::replace(&mut survivors[i], record)
                } else {
                    record
                };

                info!(
                    "Evicting duplicate worker '{}' (pid {})",
                    evicted.name, evicted.pid
                );
                if !terminator.terminate(evicted.pid) {
                    // Already gone or not ours to signal; cleanup stays
                    // best-effort.
                    debug!("Terminate of pid {} did not take effect", evicted.pid);
                }
                terminated.push(evicted);
            }
        }
    }

    Reconciled {
        survivors,
        terminated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Terminator that records every signalled PID
    struct RecordingTerminator {
        signalled: RefCell<Vec<u32>>,
        delivered: bool,
    }

    impl RecordingTerminator {
        fn new() -> Self {
            Self {
                signalled: RefCell::new(Vec::new()),
                delivered: true,
            }
        }

        fn failing() -> Self {
            Self {
                signalled: RefCell::new(Vec::new()),
                delivered: false,
            }
        }
    }

    impl ProcessTerminator for RecordingTerminator {
        fn terminate(&self, pid: u32) -> bool {
            self.signalled.borrow_mut().push(pid);
            self.delivered
        }
    }

    fn worker(pid: u32, name: &str, started_at_secs: u64) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            cmdline: Vec::new(),
            memory_bytes: 64 * 1024 * 1024,
            started_at_secs,
        }
    }

    #[test]
    fn test_singleton_groups_survive_untouched() {
        let terminator = RecordingTerminator::new();
        let result = reconcile(
            vec![worker(2001, "relay", 100), worker(2002, "indexer", 200)],
            &terminator,
        );

        assert_eq!(result.survivors.len(), 2);
        assert!(result.terminated.is_empty());
        assert!(terminator.signalled.borrow().is_empty());
    }

    #[test]
    fn test_newest_instance_survives() {
        let terminator = RecordingTerminator::new();
        let result = reconcile(
            vec![
                worker(2001, "relay", 100),
                worker(2002, "relay", 300),
                worker(2003, "relay", 200),
            ],
            &terminator,
        );

        assert_eq!(result.survivors.len(), 1);
        assert_eq!(result.survivors[0].pid, 2002);
        assert_eq!(result.survivors[0].started_at_secs, 300);

        let mut terminated: Vec<u32> = result.terminated.iter().map(|r| r.pid).collect();
        terminated.sort_unstable();
        assert_eq!(terminated, vec![2001, 2003]);
        assert_eq!(terminator.signalled.borrow().len(), 2);
    }

    #[test]
    fn test_tie_evicts_first_encountered_record() {
        let terminator = RecordingTerminator::new();
        let result = reconcile(
            vec![worker(2001, "relay", 100), worker(2002, "relay", 100)],
            &terminator,
        );

        // Equal start times: the record scanned first is the elder.
        assert_eq!(result.survivors.len(), 1);
        assert_eq!(result.survivors[0].pid, 2002);
        assert_eq!(result.terminated.len(), 1);
        assert_eq!(result.terminated[0].pid, 2001);
    }

    #[test]
    fn test_reconcile_is_idempotent_on_survivors() {
        let terminator = RecordingTerminator::new();
        let first = reconcile(
            vec![
                worker(2001, "relay", 100),
                worker(2002, "relay", 300),
                worker(2003, "indexer", 50),
            ],
            &terminator,
        );

        let second = reconcile(first.survivors.clone(), &terminator);
        assert_eq!(second.survivors, first.survivors);
        assert!(second.terminated.is_empty());
    }

    #[test]
    fn test_failed_termination_is_swallowed() {
        let terminator = RecordingTerminator::failing();
        let result = reconcile(
            vec![worker(2001, "relay", 100), worker(2002, "relay", 200)],
            &terminator,
        );

        // The pass completes and still reports the eviction.
        assert_eq!(result.survivors.len(), 1);
        assert_eq!(result.terminated.len(), 1);
        assert_eq!(*terminator.signalled.borrow(), vec![2001]);
    }
}
