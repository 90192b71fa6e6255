//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize `WALLET_API_*` variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "WALLET_API_";

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `WALLET_API_HOST` (optional): bind address, defaults to 127.0.0.1
/// - `WALLET_API_PORT` (optional): HTTP server port, defaults to 3000
/// - `WALLET_API_MIN_AMOUNT` (optional): smallest accepted deposit/withdrawal, defaults to 10
/// - `WALLET_API_POLL_INTERVAL_MS` (optional): subscriber poll interval, defaults to 1000
/// - `WALLET_API_SHUTDOWN_GRACE_SECS` (optional): graceful shutdown budget, defaults to 5
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_min_amount")]
    pub min_amount: i64,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_min_amount() -> i64 {
    10
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            min_amount: default_min_amount(),
            poll_interval_ms: default_poll_interval_ms(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads `WALLET_API_*` variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable value cannot be parsed into its expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are converted: poll_interval_ms <- WALLET_API_POLL_INTERVAL_MS
        envy::prefixed(ENV_PREFIX).from_env::<Config>()
    }

    /// Same as [`Config::from_env`] but reads from the given variables only.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX).from_iter::<_, Config>(vars)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_vars(Vec::new()).unwrap();

        assert_eq!(config.addr(), "127.0.0.1:3000");
        assert_eq!(config.min_amount, 10);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
    }

    #[test]
    fn prefixed_variables_override() {
        let config = Config::from_vars(vars(&[
            ("WALLET_API_HOST", "0.0.0.0"),
            ("WALLET_API_PORT", "8080"),
            ("WALLET_API_MIN_AMOUNT", "1"),
            ("WALLET_API_POLL_INTERVAL_MS", "250"),
            ("PORT", "9999"),
        ]))
        .unwrap();

        assert_eq!(config.addr(), "0.0.0.0:8080");
        assert_eq!(config.min_amount, 1);
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!(Config::from_vars(vars(&[("WALLET_API_PORT", "http")])).is_err());
    }
}
