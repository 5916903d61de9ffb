use super::{Config, ConfigError};
use std::time::Duration;
use url::Url;

/// Longest accepted request or connect timeout.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

fn check_url(name: &str, raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {name} '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "Invalid {name} '{raw}': scheme must be http or https"
        )));
    }

    Ok(())
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("Loki URL", &self.loki_url)?;

        if let Some(push_url) = &self.push_url {
            check_url("push URL", push_url)?;
        }

        // Validate timeouts
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Connect timeout must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS || self.connect_timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidConfig(format!(
                "Timeouts must not exceed {MAX_TIMEOUT_SECS} seconds"
            )));
        }

        if self.keep_alive_timeout.is_zero()
            || self.keep_alive_timeout > Duration::from_secs(MAX_TIMEOUT_SECS)
        {
            return Err(ConfigError::InvalidConfig(format!(
                "Keep-alive timeout must be between 1ms and {MAX_TIMEOUT_SECS} seconds"
            )));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidConfig(
                "Max connections must be greater than 0".to_string(),
            ));
        }

        if self.content_type.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Content type must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
