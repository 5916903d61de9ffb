use crate::app::ConfigError;
use crate::app::logging::LoggingError;
use crate::sender::ClientError;
use thiserror::Error;

/// Top-level error type for the shipping binary.
///
/// Connectivity and push failures wrap the same `ClientError` but are kept
/// apart so the caller can tell a startup gate failure from a delivery failure.
#[derive(Error, Debug)]
pub enum RemoteLogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Connectivity check failed: {0}")]
    Connectivity(#[source] ClientError),

    #[error("Push failed: {0}")]
    Push(#[source] ClientError),

    #[error("Payload error: {0}")]
    Payload(#[from] std::io::Error),
}
