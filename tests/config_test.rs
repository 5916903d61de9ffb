use remotelog::app::config::MAX_TIMEOUT_SECS;
use remotelog::app::{Config, ConfigError, LogFormat, LogLevel};
use serial_test::serial;
use std::io::Write;
use std::{env, path::PathBuf, time::Duration};
use tempfile::NamedTempFile;

const ENV_VARS: &[&str] = &[
    "LOKI_URL",
    "LOKI_PUSH_URL",
    "LOKI_ORG_ID",
    "LOKI_TIMEOUT_SECS",
    "LOKI_CONNECT_TIMEOUT_SECS",
    "LOKI_KEEP_ALIVE_MS",
    "LOKI_MAX_CONNECTIONS",
    "LOKI_CONTENT_TYPE",
    "PAYLOAD_FILE",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "CONFIG_FILE",
];

// Clap reads these as fallbacks, so every test starts from a clean slate
fn clean_all_env_vars() {
    unsafe {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_default_config() {
    clean_all_env_vars();

    let config = Config::from_args(["remotelog"]).unwrap();
    assert_eq!(config.loki_url, "http://localhost:3100");
    assert_eq!(config.org_id, "");
    assert_eq!(config.push_url, None);
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.content_type, "application/x-protobuf");
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.log_format, LogFormat::Compact);
}

#[test]
#[serial]
fn test_config_from_args() {
    clean_all_env_vars();

    let config = Config::from_args([
        "remotelog",
        "--loki-url",
        "https://loki.example:3100",
        "--org-id",
        "heplify-org-id",
        "--timeout-secs",
        "3",
        "--payload",
        "/tmp/batch.bin",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .unwrap();

    assert_eq!(config.loki_url, "https://loki.example:3100");
    assert_eq!(config.org_id, "heplify-org-id");
    assert_eq!(config.timeout, Duration::from_secs(3));
    assert_eq!(config.payload, Some(PathBuf::from("/tmp/batch.bin")));
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_format, LogFormat::Json);

    let client_config = config.client_config();
    assert_eq!(client_config.endpoint, "https://loki.example:3100");
    assert_eq!(client_config.org_id, "heplify-org-id");
    assert_eq!(client_config.timeout, Duration::from_secs(3));
}

#[test]
#[serial]
fn test_invalid_args_are_rejected() {
    clean_all_env_vars();

    let result = Config::from_args(["remotelog", "--loki-url", "not a url"]);
    assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));

    let result = Config::from_args(["remotelog", "--timeout-secs", "0"]);
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
#[serial]
fn test_config_from_env() {
    clean_all_env_vars();

    unsafe {
        env::set_var("LOKI_URL", "http://loki:3100");
        env::set_var("LOKI_ORG_ID", "tenant-env");
        env::set_var("LOKI_TIMEOUT_SECS", "7");
        env::set_var("LOG_LEVEL", "WARN");
        env::set_var("LOG_FORMAT", "json");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.loki_url, "http://loki:3100");
    assert_eq!(config.org_id, "tenant-env");
    assert_eq!(config.timeout, Duration::from_secs(7));
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.log_format, LogFormat::Json);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_config_from_env_rejects_garbage() {
    clean_all_env_vars();

    unsafe {
        env::set_var("LOKI_TIMEOUT_SECS", "soon");
    }
    assert!(matches!(Config::from_env(), Err(ConfigError::EnvError(_))));

    clean_all_env_vars();
}

#[test]
fn test_config_from_toml() {
    let config = Config::from_toml(
        r#"
        loki_url = "http://loki:3100/loki/api/v1/push"
        org_id = "tenant-file"
        timeout_secs = 20
        log_level = "trace"
        "#,
    )
    .unwrap();

    assert_eq!(config.loki_url, "http://loki:3100/loki/api/v1/push");
    assert_eq!(config.org_id, "tenant-file");
    assert_eq!(config.timeout, Duration::from_secs(20));
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.log_level, LogLevel::Trace);
}

#[test]
fn test_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "loki_url = \"https://logs.example\"").unwrap();
    writeln!(file, "max_connections = 4").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.loki_url, "https://logs.example");
    assert_eq!(config.max_connections, 4);
}

#[test]
fn test_config_file_errors() {
    assert!(matches!(
        Config::from_file("/nonexistent/remotelog.toml"),
        Err(ConfigError::FileError(_))
    ));
    assert!(matches!(
        Config::from_toml("timeout_secs = \"ten\""),
        Err(ConfigError::ParseError(_))
    ));
    assert!(matches!(
        Config::from_toml("max_connections = 0"),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
#[serial]
fn test_load_switches_to_config_file() {
    clean_all_env_vars();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "org_id = \"from-file\"").unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let config = Config::load([
        "remotelog",
        "--org-id",
        "from-args",
        "--config-file",
        path.as_str(),
    ])
    .unwrap();
    assert_eq!(config.org_id, "from-file");
}

#[test]
#[serial]
fn test_oversized_timeouts_are_rejected() {
    clean_all_env_vars();

    let result = Config::from_args(["remotelog", "--timeout-secs", "18446744073709551615"]);
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));

    let too_long = (MAX_TIMEOUT_SECS + 1).to_string();
    let result = Config::from_args(["remotelog", "--connect-timeout-secs", too_long.as_str()]);
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));

    let longest = MAX_TIMEOUT_SECS.to_string();
    let config = Config::from_args(["remotelog", "--timeout-secs", longest.as_str()]).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
}

#[test]
#[serial]
fn test_keep_alive_from_args_and_env() {
    clean_all_env_vars();

    let config = Config::from_args(["remotelog"]).unwrap();
    assert_eq!(config.keep_alive_timeout, Duration::from_secs(60));
    assert_eq!(config.client_config().keep_alive_timeout, Duration::from_secs(60));

    let config = Config::from_args(["remotelog", "--keep-alive-ms", "2500"]).unwrap();
    assert_eq!(config.keep_alive_timeout, Duration::from_millis(2500));

    unsafe {
        env::set_var("LOKI_KEEP_ALIVE_MS", "750");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.keep_alive_timeout, Duration::from_millis(750));

    unsafe {
        env::set_var("LOKI_KEEP_ALIVE_MS", "later");
    }
    assert!(matches!(Config::from_env(), Err(ConfigError::EnvError(_))));

    clean_all_env_vars();
}

#[test]
fn test_keep_alive_round_trips_through_toml_as_millis() {
    let config = Config::from_toml("keep_alive_timeout = 1500").unwrap();
    assert_eq!(config.keep_alive_timeout, Duration::from_millis(1500));

    let encoded = toml::to_string(&config).unwrap();
    assert!(encoded.contains("keep_alive_timeout = 1500"), "{encoded}");

    let decoded = Config::from_toml(&encoded).unwrap();
    assert_eq!(decoded.keep_alive_timeout, Duration::from_millis(1500));
    assert_eq!(decoded.timeout, config.timeout);

    assert!(matches!(
        Config::from_toml("keep_alive_timeout = 0"),
        Err(ConfigError::InvalidConfig(_))
    ));
}
