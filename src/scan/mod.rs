// Scan module - Process snapshot capture and best-effort termination

mod system;

pub use system::{SignalTerminator, SystemScanner};

use serde::Serialize;

/// Snapshot of one OS process at scan time.
///
/// Immutable once captured; a new scan produces a wholly new set of records.
/// Two records with the same `pid` across scans are not assumed to be the
/// same logical process, since PIDs may be reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    /// Process-table identifier, unique only within one scan
    pub pid: u32,
    /// Executable name as reported by the OS
    pub name: String,
    /// Full command line, one element per argument
    pub cmdline: Vec<String>,
    /// Resident memory in bytes
    pub memory_bytes: u64,
    /// Start time in seconds since the epoch, used only for relative ordering
    pub started_at_secs: u64,
}

impl ProcessRecord {
    /// Command line joined with single spaces, as matched by the
    /// managed-app predicate
    pub fn joined_cmdline(&self) -> String {
        self.cmdline.join(" ")
    }
}

/// Source of process snapshots.
///
/// Implementations must be best-effort: a process that vanishes mid-scan or
/// cannot be inspected is skipped, never an error for the whole call.
pub trait SnapshotProvider {
    fn snapshot(&mut self) -> Vec<ProcessRecord>;
}

/// Best-effort process termination.
///
/// Returns whether the signal was delivered. Terminating an already-gone PID
/// is a normal `false`, not an error.
pub trait ProcessTerminator {
    fn terminate(&self, pid: u32) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_cmdline() {
        let record = ProcessRecord {
            pid: 4242,
            name: "node".to_string(),
            cmdline: vec!["/usr/bin/node".to_string(), "index.js".to_string()],
            memory_bytes: 64 * 1024 * 1024,
            started_at_secs: 1_700_000_000,
        };
        assert_eq!(record.joined_cmdline(), "/usr/bin/node index.js");
    }

    #[test]
    fn test_joined_cmdline_empty() {
        let record = ProcessRecord {
            pid: 4242,
            name: "worker".to_string(),
            cmdline: Vec::new(),
            memory_bytes: 0,
            started_at_secs: 0,
        };
        assert_eq!(record.joined_cmdline(), "");
    }
}
