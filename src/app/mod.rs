pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{Config, ConfigError, LogFormat, LogLevel};
pub use logging::{LoggingError, setup_logging};
pub use shutdown::spawn_signal_listener;

use crate::domain::RemoteLogError;
use crate::sender::{LokiClient, PushContext, PushOutcome};
use bytes::Bytes;
use std::path::Path;
use std::process;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Reads the payload from `path`, or from stdin when no path is given.
pub async fn read_payload(path: Option<&Path>) -> Result<Bytes, RemoteLogError> {
    let payload = match path {
        Some(path) => tokio::fs::read(path).await?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            buf
        }
    };
    Ok(Bytes::from(payload))
}

/// Connectivity check, then one push. Stops at the first failure.
pub async fn run(config: Config, shutdown: CancellationToken) -> Result<PushOutcome, RemoteLogError> {
    let client = LokiClient::new(config.client_config())?;

    info!(
        label_url = %client.label_url(),
        push_url = %client.push_url(),
        tenant = %client.tenant(),
        "Checking Loki connectivity"
    );
    client.setup().await.map_err(RemoteLogError::Connectivity)?;
    info!("Loki is reachable");

    let payload = read_payload(config.payload.as_deref()).await?;

    let ctx = PushContext::new(shutdown.child_token()).with_timeout(config.timeout);
    let outcome = client
        .send(&ctx, payload)
        .await
        .map_err(RemoteLogError::Push)?;

    info!(
        status = outcome.status,
        bytes = outcome.bytes_sent,
        "Payload delivered"
    );
    Ok(outcome)
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the application
pub async fn main() -> anyhow::Result<()> {
    let config = Config::load(std::env::args_os())?;
    setup_logging(config.log_level, config.log_format)?;

    info!("Starting remotelog v{}", get_version());

    let shutdown = CancellationToken::new();
    let listener = spawn_signal_listener(shutdown.clone());
    let result = run(config, shutdown).await;
    listener.abort();

    if let Err(e) = result {
        error!("remotelog failed: {}", e);
        process::exit(1);
    }

    Ok(())
}
