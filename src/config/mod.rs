use crate::error::{Result, VigilError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Supervisor configuration with all settings for one managed application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Substring that identifies the managed runtime in a process name
    /// (matched case-insensitively)
    #[serde(default = "default_runtime_hint")]
    pub runtime_hint: String,

    /// Path to the managed application's entry-point script
    #[serde(default = "default_entry_point")]
    pub entry_point: PathBuf,

    /// Logical service name registered with the process manager
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Path to the pm2 executable
    #[serde(default = "default_pm2_path")]
    pub pm2_path: PathBuf,

    /// Lower bound of the worker-binary resident memory band (inclusive)
    #[serde(default = "default_worker_memory_min")]
    pub worker_memory_min_bytes: u64,

    /// Upper bound of the worker-binary resident memory band (inclusive)
    #[serde(default = "default_worker_memory_max")]
    pub worker_memory_max_bytes: u64,

    /// PIDs at or below this value are never classified
    #[serde(default = "default_excluded_pid_max")]
    pub excluded_pid_max: u32,

    /// Pause between deleting and re-starting the service (in seconds)
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,

    /// Delay between supervision cycles in watch mode (in seconds)
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,
}

// Default value functions for serde
fn default_runtime_hint() -> String {
    "node".to_string()
}

fn default_entry_point() -> PathBuf {
    PathBuf::from("index.js")
}

fn default_service_name() -> String {
    "nodejs-server".to_string()
}

fn default_pm2_path() -> PathBuf {
    PathBuf::from("node_modules/.bin/pm2")
}

fn default_worker_memory_min() -> u64 {
    20 * 1024 * 1024
}

fn default_worker_memory_max() -> u64 {
    120 * 1024 * 1024
}

fn default_excluded_pid_max() -> u32 {
    1000
}

fn default_settle_delay() -> u64 {
    1
}

fn default_check_interval() -> u64 {
    3
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            runtime_hint: default_runtime_hint(),
            entry_point: default_entry_point(),
            service_name: default_service_name(),
            pm2_path: default_pm2_path(),
            worker_memory_min_bytes: default_worker_memory_min(),
            worker_memory_max_bytes: default_worker_memory_max(),
            excluded_pid_max: default_excluded_pid_max(),
            settle_delay_secs: default_settle_delay(),
            check_interval_secs: default_check_interval(),
        }
    }
}

impl SupervisorConfig {
    /// Load the configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| VigilError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let config: SupervisorConfig = match extension {
            "toml" => toml::from_str(&contents)
                .map_err(|e| VigilError::InvalidConfig(format!("Failed to parse TOML: {}", e)))?,
            "json" => serde_json::from_str(&contents)
                .map_err(|e| VigilError::InvalidConfig(format!("Failed to parse JSON: {}", e)))?,
            _ => {
                return Err(VigilError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration for a CLI invocation: an explicit path must
    /// load, otherwise built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.runtime_hint.trim().is_empty() {
            return Err(VigilError::ConfigValidationError(
                "runtime_hint cannot be empty".to_string(),
            ));
        }

        if self.service_name.trim().is_empty() {
            return Err(VigilError::ConfigValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }

        if self.entry_file_name().is_empty() {
            return Err(VigilError::ConfigValidationError(format!(
                "entry_point has no file name: {}",
                self.entry_point.display()
            )));
        }

        if self.worker_memory_min_bytes > self.worker_memory_max_bytes {
            return Err(VigilError::ConfigValidationError(format!(
                "worker memory band is inverted: {} > {}",
                self.worker_memory_min_bytes, self.worker_memory_max_bytes
            )));
        }

        Ok(())
    }

    /// File name of the entry-point script, used by the managed-app predicate
    pub fn entry_file_name(&self) -> &str {
        self.entry_point
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    /// Settle pause between delete and start
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Delay between cycles in watch mode
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}
