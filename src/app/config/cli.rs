use super::serde_helpers::{
    load_env_path_opt, load_env_string, load_env_string_opt, load_env_var, parse_millis,
};
use super::{ConfigError, LogFormat, LogLevel};
use crate::sender::ClientConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about = "Ship a log payload to a Loki push endpoint", long_about = None)]
#[serde(default)]
pub struct Config {
    /// Loki base URL (a full push URL is accepted as well)
    #[arg(long, env = "LOKI_URL", default_value = "http://localhost:3100")]
    pub loki_url: String,

    /// Explicit push URL, overriding the one derived from the base URL
    #[arg(long, env = "LOKI_PUSH_URL")]
    pub push_url: Option<String>,

    /// Tenant sent as X-Scope-OrgID (empty to omit the header)
    #[arg(long, env = "LOKI_ORG_ID", default_value = "")]
    pub org_id: String,

    /// Request timeout in seconds
    #[arg(long, env = "LOKI_TIMEOUT_SECS", default_value = "10")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[arg(long, env = "LOKI_CONNECT_TIMEOUT_SECS", default_value = "5")]
    pub connect_timeout_secs: u64,

    /// Idle pooled connections are closed after this many milliseconds
    #[arg(
        long = "keep-alive-ms",
        env = "LOKI_KEEP_ALIVE_MS",
        value_parser = parse_millis,
        default_value = "60000"
    )]
    #[serde(with = "super::serde_helpers")]
    pub keep_alive_timeout: Duration,

    /// Maximum idle HTTP connections kept per host
    #[arg(long, env = "LOKI_MAX_CONNECTIONS", default_value = "10")]
    pub max_connections: usize,

    /// Content-Type of pushed payloads
    #[arg(long, env = "LOKI_CONTENT_TYPE", default_value = "application/x-protobuf")]
    pub content_type: String,

    /// File holding the serialized payload (stdin when absent)
    #[arg(long, env = "PAYLOAD_FILE")]
    pub payload: Option<PathBuf>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub timeout: Duration,

    #[serde(skip)]
    #[arg(skip)]
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loki_url: "http://localhost:3100".to_string(),
            push_url: None,
            org_id: String::new(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
            keep_alive_timeout: Duration::from_secs(60),
            max_connections: 10,
            content_type: "application/x-protobuf".to_string(),
            payload: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Compact,
            config_file: None,
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    /// Parses the command line, then switches to the configuration file when
    /// one is named. The file replaces the command line entirely.
    pub fn load<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Self::from_args(args)?;
        match &config.config_file {
            Some(path) => Self::from_file(path),
            None => Ok(config),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        load_env_string("LOKI_URL", &mut config.loki_url);
        load_env_string_opt("LOKI_PUSH_URL", &mut config.push_url);
        load_env_string("LOKI_ORG_ID", &mut config.org_id);
        load_env_var("LOKI_TIMEOUT_SECS", &mut config.timeout_secs)?;
        load_env_var("LOKI_CONNECT_TIMEOUT_SECS", &mut config.connect_timeout_secs)?;
        if let Ok(raw) = std::env::var("LOKI_KEEP_ALIVE_MS") {
            config.keep_alive_timeout = parse_millis(&raw)
                .map_err(|e| ConfigError::EnvError(format!("Invalid LOKI_KEEP_ALIVE_MS: {e}")))?;
        }
        load_env_var("LOKI_MAX_CONNECTIONS", &mut config.max_connections)?;
        load_env_string("LOKI_CONTENT_TYPE", &mut config.content_type);
        load_env_path_opt("PAYLOAD_FILE", &mut config.payload);
        load_env_var("LOG_LEVEL", &mut config.log_level)?;
        load_env_var("LOG_FORMAT", &mut config.log_format)?;
        load_env_path_opt("CONFIG_FILE", &mut config.config_file);

        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn post_process(&mut self) {
        // Convert seconds to Duration
        self.timeout = Duration::from_secs(self.timeout_secs);
        self.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.loki_url.clone(),
            push_url: self.push_url.clone(),
            org_id: self.org_id.clone(),
            timeout: self.timeout,
            connection_timeout: self.connect_timeout,
            max_connections: self.max_connections,
            keep_alive_timeout: self.keep_alive_timeout,
            content_type: self.content_type.clone(),
            ..ClientConfig::default()
        }
    }
}
