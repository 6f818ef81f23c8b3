// Pm2 module - Client for the external process manager

use crate::error::{Result, VigilError};
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Lifecycle commands the supervisor issues to the external process manager.
///
/// `restart` and `start` report failure with the manager's diagnostic text;
/// `delete` and `save` failures are ignorable at the call sites that use them.
pub trait ServiceManager {
    fn restart(&self, service: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn delete(&self, service: &str) -> impl std::future::Future<Output = Result<()>> + Send;
    fn start(
        &self,
        script: &Path,
        service: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn save(&self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Service manager client that drives a pm2 installation
pub struct Pm2Client {
    pm2_path: PathBuf,
}

impl Pm2Client {
    pub fn new(pm2_path: impl Into<PathBuf>) -> Self {
        Self {
            pm2_path: pm2_path.into(),
        }
    }

    async fn exec(&self, args: &[&str]) -> Result<()> {
        let command_line = format!("{} {}", self.pm2_path.display(), args.join(" "));
        debug!("Running service manager command: {}", command_line);

        let output: Output = Command::new(&self.pm2_path)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                VigilError::ServiceManagerUnavailable(format!(
                    "Failed to run {}: {}",
                    self.pm2_path.display(),
                    e
                ))
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(VigilError::ServiceCommand {
                command: command_line,
                diagnostic: diagnostic_text(&output),
            })
        }
    }
}

/// Prefer stderr for the diagnostic, falling back to stdout and finally the
/// exit status when the manager printed nothing.
fn diagnostic_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let trimmed = stdout.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    format!("exited with {}", output.status)
}

impl ServiceManager for Pm2Client {
    async fn restart(&self, service: &str) -> Result<()> {
        self.exec(&["restart", service]).await
    }

    async fn delete(&self, service: &str) -> Result<()> {
        self.exec(&["delete", service]).await
    }

    async fn start(&self, script: &Path, service: &str) -> Result<()> {
        let script = script.to_string_lossy();
        self.exec(&["start", script.as_ref(), "--name", service])
            .await
    }

    async fn save(&self) -> Result<()> {
        self.exec(&["save", "--force"]).await
    }
}
