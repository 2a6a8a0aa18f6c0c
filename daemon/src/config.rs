//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the election service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_str`] or
/// built programmatically. The signing credential is deliberately absent:
/// it is only ever taken from the environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Data directory for the LMDB record store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Maximum LMDB data file size, in megabytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// HTTP API port.
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Base URL of the contract gateway.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Address of the deployed voting contract.
    #[serde(default)]
    pub contract: String,

    /// Interval between transaction confirmation polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up waiting for a transaction confirmation after this long.
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./scrutin_data")
}

fn default_map_size_mb() -> usize {
    256
}

fn default_http_port() -> u16 {
    7080
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:8945".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_confirm_timeout_secs() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            http_port: default_http_port(),
            gateway_url: default_gateway_url(),
            contract: String::new(),
            poll_interval_ms: default_poll_interval_ms(),
            confirm_timeout_secs: default_confirm_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.http_port, 7080);
        assert_eq!(config.map_size_mb, 256);
        assert_eq!(config.log_level, "info");
        assert!(config.contract.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            http_port = 9999
            contract = "0xabc"
        "#;
        let config = ServiceConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.http_port, 9999);
        assert_eq!(config.contract, "0xabc");
        assert_eq!(config.gateway_url, "http://127.0.0.1:8945"); // default
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ServiceConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed = ServiceConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.http_port, config.http_port);
        assert_eq!(parsed.gateway_url, config.gateway_url);
    }
}
