//! Configuration management for the order ledger server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file in the working directory, if any, is loaded first and never
//! overrides variables already set. A variable that is absent takes its
//! default; a variable that is present but cannot be parsed is an error.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set to a value that could not be parsed.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Environment variable name
        name: &'static str,
        /// Offending value
        value: String,
        /// What was expected instead
        reason: String,
    },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-field lines
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err("expected `pretty` or `json`".to_string()),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Host to bind to (`HOST`)
    pub host: String,
    /// Port to bind to (`PORT`)
    pub port: u16,
    /// Tracing filter directives (`RUST_LOG`)
    pub log_level: String,
    /// Log output format (`LOG_FORMAT`)
    pub log_format: LogFormat,
    /// Maximum number of events the log accepts, `None` for unbounded
    /// (`EVENT_LOG_CAPACITY`)
    pub event_log_capacity: Option<usize>,
    /// Install the Prometheus recorder and serve `/metrics` (`METRICS_ENABLED`)
    pub metrics_enabled: bool,
    /// Graceful shutdown timeout in seconds (`SHUTDOWN_TIMEOUT`)
    pub shutdown_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            event_log_capacity: None,
            metrics_enabled: true,
            shutdown_timeout: 30,
        }
    }
}

impl Config {
    /// Load `.env` into the process environment, then read configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any variable that is set but
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        // Absent outside development.
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any variable that is set but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for any variable that is set but
    /// cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: parse(&lookup, "LOG_FORMAT")?.unwrap_or(defaults.log_format),
            event_log_capacity: parse(&lookup, "EVENT_LOG_CAPACITY")?,
            metrics_enabled: parse_bool(&lookup, "METRICS_ENABLED")?
                .unwrap_or(defaults.metrics_enabled),
            shutdown_timeout: parse(&lookup, "SHUTDOWN_TIMEOUT")?
                .unwrap_or(defaults.shutdown_timeout),
        })
    }

    /// Socket address to bind, as `host:port`.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Graceful shutdown timeout.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

fn parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(name)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<bool>, ConfigError> {
    lookup(name)
        .map(|value| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                value,
                reason: "expected a boolean".to_string(),
            }),
        })
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("EVENT_LOG_CAPACITY", "500"),
            ("METRICS_ENABLED", "false"),
            ("SHUTDOWN_TIMEOUT", "5"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.event_log_capacity, Some(500));
        assert!(!config.metrics_enabled);
        assert_eq!(config.shutdown_timeout, 5);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn invalid_capacity_is_an_error() {
        let err = load(&[("EVENT_LOG_CAPACITY", "-1")]).unwrap_err();
        assert!(err.to_string().contains("EVENT_LOG_CAPACITY"));
    }

    #[test]
    fn dotenv_file_lines_are_read() {
        let file = "# ledger\nPORT=9100\nEVENT_LOG_CAPACITY=\"250\"\nLOG_FORMAT=json\n";
        let vars: HashMap<String, String> = dotenvy::from_read_iter(file.as_bytes())
            .map(Result::unwrap)
            .collect();

        let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.port, 9100);
        assert_eq!(config.event_log_capacity, Some(250));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn invalid_flags_are_errors() {
        assert!(load(&[("METRICS_ENABLED", "maybe")]).is_err());
        assert!(load(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
