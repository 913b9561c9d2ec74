//! Configuration loading and representation.
//!
//! Everything comes from the process environment. Unset variables fall back
//! to defaults; set-but-malformed variables are an error naming the variable.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Process configuration for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// `None` selects the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub run_migrations: bool,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

// The URL usually carries credentials.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr: SocketAddr = parse_var(&lookup, "VIDCAT_BIND_ADDR")?
            .unwrap_or(SocketAddr::from(DEFAULT_BIND_ADDR));

        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => {
                let max_connections: u32 = parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS);
                if max_connections == 0 {
                    return Err(ConfigError::Invalid {
                        var: "DATABASE_MAX_CONNECTIONS",
                        reason: "must be at least 1".to_string(),
                    });
                }
                let acquire_timeout_secs: u64 = parse_var(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS")?
                    .unwrap_or(DEFAULT_ACQUIRE_TIMEOUT_SECS);

                Some(DatabaseConfig {
                    url,
                    max_connections,
                    acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                })
            }
            None => None,
        };

        let run_migrations: bool = parse_var(&lookup, "VIDCAT_RUN_MIGRATIONS")?.unwrap_or(true);

        Ok(Self {
            bind_addr,
            database,
            run_migrations,
        })
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_to_in_memory_store() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(cfg.database.is_none());
        assert!(cfg.run_migrations);
    }

    #[test]
    fn database_settings_are_parsed() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://u:p@localhost/vidcat"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("DATABASE_ACQUIRE_TIMEOUT_SECS", "2"),
            ("VIDCAT_RUN_MIGRATIONS", "false"),
            ("VIDCAT_BIND_ADDR", "127.0.0.1:9000"),
        ])
        .unwrap();

        let db = cfg.database.unwrap();
        assert_eq!(db.max_connections, 4);
        assert_eq!(db.acquire_timeout, Duration::from_secs(2));
        assert!(!cfg.run_migrations);
        assert_eq!(cfg.bind_addr.port(), 9000);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = config(&[("VIDCAT_BIND_ADDR", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "VIDCAT_BIND_ADDR", .. }));

        let err = config(&[
            ("DATABASE_URL", "postgres://localhost/vidcat"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DATABASE_MAX_CONNECTIONS", .. }));
    }

    #[test]
    fn debug_output_hides_database_url() {
        let cfg = config(&[("DATABASE_URL", "postgres://user:secret@db/vidcat")]).unwrap();
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("secret"));
    }
}
