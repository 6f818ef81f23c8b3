use crate::config::SupervisorConfig;
use crate::scan::ProcessRecord;

/// Classification of one process within a single scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessClass {
    ManagedApp,
    WorkerBinary,
    Ignored,
}

/// Snapshot partitioned into the two process sets the supervisor acts on
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub managed: Vec<ProcessRecord>,
    pub workers: Vec<ProcessRecord>,
}

/// Partitions process snapshots by name, command line and memory footprint
pub struct Classifier {
    runtime_hint: String,
    entry_file: String,
    memory_min: u64,
    memory_max: u64,
    excluded_pid_max: u32,
}

impl Classifier {
    pub fn new(config: &SupervisorConfig) -> Self {
        Self {
            runtime_hint: config.runtime_hint.to_lowercase(),
            entry_file: config.entry_file_name().to_string(),
            memory_min: config.worker_memory_min_bytes,
            memory_max: config.worker_memory_max_bytes,
            excluded_pid_max: config.excluded_pid_max,
        }
    }

    /// Classify one record. Total and deterministic; first matching rule wins.
    pub fn class_of(&self, record: &ProcessRecord) -> ProcessClass {
        // Low PIDs belong to the OS and are reused; never touch them.
        if record.pid <= self.excluded_pid_max {
            return ProcessClass::Ignored;
        }

        if record.name.to_lowercase().contains(&self.runtime_hint)
            && record.joined_cmdline().contains(&self.entry_file)
        {
            return ProcessClass::ManagedApp;
        }

        if (self.memory_min..=self.memory_max).contains(&record.memory_bytes) {
            return ProcessClass::WorkerBinary;
        }

        ProcessClass::Ignored
    }

    /// Partition a snapshot, dropping ignored records
    pub fn classify(&self, snapshot: &[ProcessRecord]) -> Classified {
        let mut classified = Classified::default();

        for record in snapshot {
            match self.class_of(record) {
                ProcessClass::ManagedApp => classified.managed.push(record.clone()),
                ProcessClass::WorkerBinary => classified.workers.push(record.clone()),
                ProcessClass::Ignored => {}
            }
        }

        classified
    }
}
