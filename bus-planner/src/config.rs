//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Listen port when `BUS_PLANNER_ADDR` is unset (bound on localhost).
const DEFAULT_PORT: u16 = 3000;

/// Timetable directory when `BUS_PLANNER_DATA` is unset.
const DEFAULT_DATA_DIR: &str = "./data/txt";

/// Refresh period when `BUS_PLANNER_REFRESH_SECS` is unset (1 hour).
const DEFAULT_REFRESH_SECS: u64 = 60 * 60;

/// Error from reading the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    var: &'static str,
    value: String,
    reason: String,
}

/// Configuration of the HTTP server binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,

    /// Directory of timetable files
    pub data_dir: PathBuf,

    /// How often the timetable directory is reloaded
    pub refresh_interval: Duration,
}

impl ServerConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr = match lookup("BUS_PLANNER_ADDR") {
            Some(value) => value.parse().map_err(|e: std::net::AddrParseError| ConfigError {
                var: "BUS_PLANNER_ADDR",
                reason: e.to_string(),
                value,
            })?,
            None => SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
        };

        let data_dir = lookup("BUS_PLANNER_DATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let refresh_secs = match lookup("BUS_PLANNER_REFRESH_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError {
                        var: "BUS_PLANNER_REFRESH_SECS",
                        value,
                        reason: "must be positive".to_string(),
                    });
                }
                Ok(secs) => secs,
                Err(e) => {
                    return Err(ConfigError {
                        var: "BUS_PLANNER_REFRESH_SECS",
                        reason: e.to_string(),
                        value,
                    });
                }
            },
            None => DEFAULT_REFRESH_SECS,
        };

        Ok(Self {
            addr,
            data_dir,
            refresh_interval: Duration::from_secs(refresh_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("./data/txt"));
        assert_eq!(config.refresh_interval, Duration::from_secs(3600));
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BUS_PLANNER_ADDR", "0.0.0.0:8080"),
            ("BUS_PLANNER_DATA", "/srv/timetables"),
            ("BUS_PLANNER_REFRESH_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/srv/timetables"));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("BUS_PLANNER_ADDR", "localhost")]))
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid BUS_PLANNER_ADDR=\"localhost\""));

        let err = ServerConfig::from_lookup(lookup(&[("BUS_PLANNER_REFRESH_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid BUS_PLANNER_REFRESH_SECS=\"soon\""));

        let err = ServerConfig::from_lookup(lookup(&[("BUS_PLANNER_REFRESH_SECS", "0")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid BUS_PLANNER_REFRESH_SECS=\"0\": must be positive"
        );
    }
}
