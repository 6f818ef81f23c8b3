// Supervisor module - Classification, reconciliation and restart policy

pub mod classify;
pub mod cycle;
pub mod health;
pub mod reconcile;
pub mod restart;

pub use classify::{Classified, Classifier, ProcessClass};
pub use cycle::{run_supervision_cycle, CycleReport, RestartReport};
pub use health::{evaluate, Verdict};
pub use reconcile::{reconcile, Reconciled};
pub use restart::{restart_managed_app, RestartMethod};
