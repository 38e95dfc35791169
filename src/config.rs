use std::env;
use std::time::Duration;

use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_DATABASE: &str = "eventhub";
const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_SOCKET_TIMEOUT_MS: u64 = 45_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub database: String,
    pub server_selection_timeout: Duration,
    pub socket_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads the process environment. `MONGODB_URI` is mandatory.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mongodb_uri = var("MONGODB_URI").ok_or_else(|| {
            Error::Configuration("Please define the MONGODB_URI environment variable".to_string())
        })?;

        let database = var("MONGODB_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let server_selection_timeout = Duration::from_millis(parse_millis(
            "MONGODB_SERVER_SELECTION_TIMEOUT_MS",
            var("MONGODB_SERVER_SELECTION_TIMEOUT_MS"),
            DEFAULT_SERVER_SELECTION_TIMEOUT_MS,
        )?);
        let socket_timeout = Duration::from_millis(parse_millis(
            "MONGODB_SOCKET_TIMEOUT_MS",
            var("MONGODB_SOCKET_TIMEOUT_MS"),
            DEFAULT_SOCKET_TIMEOUT_MS,
        )?);

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::Configuration(format!("PORT is not a valid port: {}", raw)))?,
            None => 3000,
        };

        debug!("Using database '{}'", database);

        Ok(Self {
            mongodb_uri,
            database,
            server_selection_timeout,
            socket_timeout,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_millis(key: &str, raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Configuration(format!("{} must be a number of milliseconds", key))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config =
            Config::from_lookup(lookup(&[("MONGODB_URI", "mongodb://localhost:27017")])).unwrap();

        assert_eq!(config.mongodb_uri, "mongodb://localhost:27017");
        assert_eq!(config.database, "eventhub");
        assert_eq!(config.server_selection_timeout, Duration::from_millis(5_000));
        assert_eq!(config.socket_timeout, Duration::from_millis(45_000));
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DB", "events_test"),
            ("MONGODB_SERVER_SELECTION_TIMEOUT_MS", "250"),
            ("PORT", "8081"),
        ]))
        .unwrap();

        assert_eq!(config.database, "events_test");
        assert_eq!(config.server_selection_timeout, Duration::from_millis(250));
        assert_eq!(config.port, 8081);
    }

    #[test]
    fn test_missing_uri_is_configuration_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("MONGODB_URI")));
    }

    #[test]
    fn test_blank_uri_is_configuration_error() {
        let err = Config::from_lookup(lookup(&[("MONGODB_URI", "   ")])).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_non_numeric_port_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("PORT", "abc"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Configuration(ref msg) if msg.starts_with("PORT")));
    }

    #[test]
    fn test_non_numeric_timeout_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("MONGODB_SOCKET_TIMEOUT_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, Error::Configuration(ref msg) if msg.starts_with("MONGODB_SOCKET_TIMEOUT_MS"))
        );
    }

    #[test]
    fn test_bind_addr() {
        let config = Config {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database: "eventhub".to_string(),
            server_selection_timeout: Duration::from_secs(5),
            socket_timeout: Duration::from_secs(45),
            host: "127.0.0.1".to_string(),
            port: 8080,
        };

        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }
}
