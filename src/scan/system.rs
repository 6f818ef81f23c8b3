use crate::scan::{ProcessRecord, ProcessTerminator, SnapshotProvider};
use sysinfo::{Process, ProcessRefreshKind, System};
use tracing::debug;

/// Snapshot provider backed by the OS process table via sysinfo
pub struct SystemScanner {
    system: System,
}

impl SystemScanner {
    pub fn new() -> Self {
        Self {
            system: System::new_all(),
        }
    }
}

impl Default for SystemScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotProvider for SystemScanner {
    fn snapshot(&mut self) -> Vec<ProcessRecord> {
        self.system.refresh_processes_specifics(
            sysinfo::ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::everything(),
        );

        let mut records: Vec<ProcessRecord> = self
            .system
            .processes()
            .values()
            .filter_map(capture)
            .collect();

        // The process table iterates in hash order; sort so duplicate
        // eviction always sees the same input order.
        records.sort_by_key(|r| r.pid);
        records
    }
}

/// Capture all needed fields of one process at once.
///
/// Returns `None` for processes whose identity cannot be read (vanished
/// mid-scan or hidden from this user); scanning is best-effort and a single
/// inaccessible process never aborts the snapshot.
fn capture(process: &Process) -> Option<ProcessRecord> {
    let name = process.name().to_str()?.to_string();
    if name.is_empty() {
        return None;
    }

    let cmdline = process
        .cmd()
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();

    Some(ProcessRecord {
        pid: process.pid().as_u32(),
        name,
        cmdline,
        memory_bytes: process.memory(),
        started_at_secs: process.start_time(),
    })
}

/// Terminator that delivers SIGTERM through the OS
pub struct SignalTerminator;

impl ProcessTerminator for SignalTerminator {
    fn terminate(&self, pid: u32) -> bool {
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        match signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => true,
            Err(e) => {
                // Already-gone or permission-denied processes are left alone.
                debug!("SIGTERM to pid {} not delivered: {}", pid, e);
                false
            }
        }
    }
}
