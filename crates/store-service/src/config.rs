//! Storefront service configuration.
//!
//! Configuration is loaded from environment variables with sensible
//! defaults; the only required knob in practice is the listen port.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default listen host.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Paths exempt from request instrumentation unless overridden.
pub const DEFAULT_METRICS_EXEMPT_PATHS: [&str; 2] = ["/metrics", "/favicon.ico"];

/// Storefront service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port (default: 5000).
    pub port: u16,

    /// Listen host (default: "0.0.0.0").
    pub bind_host: String,

    /// Request paths excluded from HTTP metrics instrumentation.
    /// The exposition route must stay on this list so scrapes cannot
    /// recurse into the metrics they collect.
    pub metrics_exempt_paths: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port configuration: {0}")]
    InvalidPort(String),

    #[error("Invalid metrics exempt path configuration: {0}")]
    InvalidExemptPath(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = if let Some(value_str) = vars.get("PORT") {
            value_str.parse().map_err(|e| {
                ConfigError::InvalidPort(format!(
                    "PORT must be a valid port number, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_PORT
        };

        let bind_host = vars
            .get("BIND_HOST")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let metrics_exempt_paths = if let Some(value_str) = vars.get("METRICS_EXEMPT_PATHS") {
            let paths: Vec<String> = value_str
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string)
                .collect();

            for path in &paths {
                if !path.starts_with('/') {
                    return Err(ConfigError::InvalidExemptPath(format!(
                        "exempt paths must start with '/', got '{}'",
                        path
                    )));
                }
            }

            paths
        } else {
            DEFAULT_METRICS_EXEMPT_PATHS
                .iter()
                .map(ToString::to_string)
                .collect()
        };

        Ok(Config {
            port,
            bind_host,
            metrics_exempt_paths,
        })
    }

    /// The socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars_defaults() {
        let vars = HashMap::new();

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_host, "0.0.0.0");
        assert_eq!(
            config.metrics_exempt_paths,
            vec!["/metrics".to_string(), "/favicon.ico".to_string()]
        );
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_from_vars_custom_values() {
        let vars = HashMap::from([
            ("PORT".to_string(), "8080".to_string()),
            ("BIND_HOST".to_string(), "127.0.0.1".to_string()),
            (
                "METRICS_EXEMPT_PATHS".to_string(),
                "/metrics,/health,/favicon.ico".to_string(),
            ),
        ]);

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.metrics_exempt_paths.len(), 3);
        assert!(config.metrics_exempt_paths.contains(&"/health".to_string()));
    }

    #[test]
    fn test_exempt_paths_trims_whitespace_and_empties() {
        let vars = HashMap::from([(
            "METRICS_EXEMPT_PATHS".to_string(),
            " /metrics , ,/favicon.ico,".to_string(),
        )]);

        let config = Config::from_vars(&vars).expect("Config should load successfully");
        assert_eq!(
            config.metrics_exempt_paths,
            vec!["/metrics".to_string(), "/favicon.ico".to_string()]
        );
    }

    #[test]
    fn test_port_rejects_non_numeric() {
        let vars = HashMap::from([("PORT".to_string(), "five-thousand".to_string())]);

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidPort(msg)) if msg.contains("must be a valid port number"))
        );
    }

    #[test]
    fn test_port_rejects_out_of_range() {
        let vars = HashMap::from([("PORT".to_string(), "70000".to_string())]);

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_exempt_path_must_be_absolute() {
        let vars = HashMap::from([(
            "METRICS_EXEMPT_PATHS".to_string(),
            "metrics".to_string(),
        )]);

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidExemptPath(msg)) if msg.contains("must start with '/'"))
        );
    }
}
