use crate::config::SupervisorConfig;
use crate::error::{Result, VigilError};
use crate::pm2::ServiceManager;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Which orchestration path brought the service back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartMethod {
    /// The process manager restarted the service in place
    InPlace,
    /// The service entry was deleted and started fresh
    Recreated,
}

/// Drive the managed application back to a running state.
///
/// Tries an in-place restart by logical service name first; when the manager
/// does not know the service, falls back to delete (failure ignored), a short
/// settle pause, then a fresh start of the entry-point script. There is no
/// retry beyond that single fallback; the next supervision cycle is the retry.
///
/// Errors:
/// * `MissingArtifact` - the entry-point script is gone, which no amount of
///   restarting can fix; the manager is never invoked.
/// * `RestartFailed` - both paths failed, carrying the manager's diagnostic.
pub async fn restart_managed_app<M: ServiceManager>(
    config: &SupervisorConfig,
    manager: &M,
) -> Result<RestartMethod> {
    if !config.entry_point.exists() {
        return Err(VigilError::MissingArtifact(config.entry_point.clone()));
    }

    info!("Restarting service '{}'", config.service_name);

    match manager.restart(&config.service_name).await {
        Ok(()) => {
            save_state(manager).await;
            Ok(RestartMethod::InPlace)
        }
        Err(e) => {
            info!(
                "In-place restart of '{}' failed ({}), recreating service entry",
                config.service_name, e
            );

            // Deleting a service the manager never knew about fails; that is
            // exactly the situation the fallback exists for.
            if let Err(e) = manager.delete(&config.service_name).await {
                debug!("Delete of '{}' ignored: {}", config.service_name, e);
            }

            tokio::time::sleep(config.settle_delay()).await;

            manager
                .start(&config.entry_point, &config.service_name)
                .await
                .map_err(|e| VigilError::RestartFailed(e.to_string()))?;

            save_state(manager).await;
            Ok(RestartMethod::Recreated)
        }
    }
}

/// Persisting the manager's process list is advisory; a failure here never
/// fails the cycle.
async fn save_state<M: ServiceManager>(manager: &M) {
    if let Err(e) = manager.save().await {
        warn!("Service manager state save ignored: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VigilError;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Scripted service manager recording the order of calls it receives
    struct ScriptedManager {
        calls: Mutex<Vec<String>>,
        restart_ok: bool,
        start_ok: bool,
        save_ok: bool,
    }

    impl ScriptedManager {
        fn new(restart_ok: bool, start_ok: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                restart_ok,
                start_ok,
                save_ok: true,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn command_error(&self, command: &str) -> VigilError {
            VigilError::ServiceCommand {
                command: command.to_string(),
                diagnostic: format!("{} rejected", command),
            }
        }
    }

    impl ServiceManager for ScriptedManager {
        async fn restart(&self, _service: &str) -> Result<()> {
            self.record("restart");
            if self.restart_ok {
                Ok(())
            } else {
                Err(self.command_error("restart"))
            }
        }

        async fn delete(&self, _service: &str) -> Result<()> {
            self.record("delete");
            // Deleting an unknown service always fails, like real pm2.
            Err(self.command_error("delete"))
        }

        async fn start(&self, _script: &Path, _service: &str) -> Result<()> {
            self.record("start");
            if self.start_ok {
                Ok(())
            } else {
                Err(self.command_error("start"))
            }
        }

        async fn save(&self) -> Result<()> {
            self.record("save");
            if self.save_ok {
                Ok(())
            } else {
                Err(self.command_error("save"))
            }
        }
    }

    /// Config whose entry point exists inside `dir` and whose settle delay is
    /// zero to keep tests fast
    fn config_with_entry(dir: &TempDir) -> SupervisorConfig {
        let entry = dir.path().join("index.js");
        std::fs::write(&entry, "// entry\n").unwrap();

        let mut config = SupervisorConfig::default();
        config.entry_point = entry;
        config.settle_delay_secs = 0;
        config
    }

    #[tokio::test]
    async fn test_missing_artifact_skips_manager_entirely() {
        let mut config = SupervisorConfig::default();
        config.entry_point = PathBuf::from("/nonexistent/index.js");

        let manager = ScriptedManager::new(true, true);
        let result = restart_managed_app(&config, &manager).await;

        assert!(matches!(result, Err(VigilError::MissingArtifact(_))));
        assert!(manager.calls().is_empty());
    }

    #[tokio::test]
    async fn test_in_place_restart_short_circuits() {
        let dir = TempDir::new().unwrap();
        let config = config_with_entry(&dir);

        let manager = ScriptedManager::new(true, true);
        let result = restart_managed_app(&config, &manager).await.unwrap();

        assert_eq!(result, RestartMethod::InPlace);
        assert_eq!(manager.calls(), vec!["restart", "save"]);
    }

    #[tokio::test]
    async fn test_fallback_recreates_despite_delete_failure() {
        let dir = TempDir::new().unwrap();
        let config = config_with_entry(&dir);

        let manager = ScriptedManager::new(false, true);
        let result = restart_managed_app(&config, &manager).await.unwrap();

        assert_eq!(result, RestartMethod::Recreated);
        assert_eq!(manager.calls(), vec!["restart", "delete", "start", "save"]);
    }

    #[tokio::test]
    async fn test_double_failure_carries_start_diagnostic() {
        let dir = TempDir::new().unwrap();
        let config = config_with_entry(&dir);

        let manager = ScriptedManager::new(false, false);
        let result = restart_managed_app(&config, &manager).await;

        match result {
            Err(VigilError::RestartFailed(diagnostic)) => {
                assert!(diagnostic.contains("start rejected"));
            }
            other => panic!("expected RestartFailed, got {:?}", other),
        }
        assert_eq!(manager.calls(), vec!["restart", "delete", "start"]);
    }

    #[tokio::test]
    async fn test_save_failure_is_ignored() {
        let dir = TempDir::new().unwrap();
        let config = config_with_entry(&dir);

        let mut manager = ScriptedManager::new(true, true);
        manager.save_ok = false;

        let result = restart_managed_app(&config, &manager).await.unwrap();
        assert_eq!(result, RestartMethod::InPlace);
    }
}
