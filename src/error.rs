use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the vigil supervisor
#[derive(Debug, Error)]
pub enum VigilError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // Restart orchestration errors
    #[error("Managed application artifact missing: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("Failed to start managed application: {0}")]
    RestartFailed(String),

    // Service manager errors
    #[error("Service manager command `{command}` failed: {diagnostic}")]
    ServiceCommand { command: String, diagnostic: String },

    #[error("Failed to launch service manager: {0}")]
    ServiceManagerUnavailable(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type alias for vigil operations
pub type Result<T> = std::result::Result<T, VigilError>;
