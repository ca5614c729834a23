//! Database configuration.
//!
//! Configuration is built in code with the [`DbConfig`] builder, or loaded
//! from environment variables with fallback to defaults:
//!
//! | Variable                          | Default       |
//! |-----------------------------------|---------------|
//! | `CATALOG_DATABASE_PATH`           | `catalog.db`  |
//! | `CATALOG_DB_MAX_CONNECTIONS`      | `5`           |
//! | `CATALOG_DB_MIN_CONNECTIONS`      | `1`           |
//! | `CATALOG_DB_CONNECT_TIMEOUT_SECS` | `30`          |
//! | `CATALOG_DB_RUN_MIGRATIONS`       | `true`        |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_DATABASE_PATH: &str = "CATALOG_DATABASE_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "CATALOG_DB_MAX_CONNECTIONS";
pub const ENV_MIN_CONNECTIONS: &str = "CATALOG_DB_MIN_CONNECTIONS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "CATALOG_DB_CONNECT_TIMEOUT_SECS";
pub const ENV_RUN_MIGRATIONS: &str = "CATALOG_DB_RUN_MIGRATIONS";

/// Path that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Database configuration.
///
/// ## Example
/// ```rust
/// use catalog_db::DbConfig;
///
/// let config = DbConfig::new("/path/to/catalog.db")
///     .max_connections(5)
///     .min_connections(1);
/// assert_eq!(config.max_connections, 5);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection acquire timeout.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Each pool gets its own isolated database, which lives as long as the
    /// pool's single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Loads configuration from `CATALOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Unset keys fall back to the [`DbConfig::new`] defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = lookup(ENV_DATABASE_PATH).unwrap_or_else(|| "catalog.db".to_string());
        let defaults = DbConfig::new(path);

        let config = DbConfig {
            max_connections: parse_or(&lookup, ENV_MAX_CONNECTIONS, defaults.max_connections)?,
            min_connections: parse_or(&lookup, ENV_MIN_CONNECTIONS, defaults.min_connections)?,
            connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                ENV_CONNECT_TIMEOUT_SECS,
                defaults.connect_timeout.as_secs(),
            )?),
            run_migrations: parse_or(&lookup, ENV_RUN_MIGRATIONS, defaults.run_migrations)?,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks pool sizing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(ENV_MAX_CONNECTIONS.to_string()));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::MinExceedsMax {
                min: self.min_connections,
                max: self.max_connections,
            });
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Minimum connections ({min}) exceeds maximum ({max})")]
    MinExceedsMax { min: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2)
            .run_migrations(false);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert!(!config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = DbConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database_path, PathBuf::from("catalog.db"));
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
        assert!(config.run_migrations);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = DbConfig::from_lookup(lookup_from(&[
            (ENV_DATABASE_PATH, "/data/shop.db"),
            (ENV_MAX_CONNECTIONS, "8"),
            (ENV_MIN_CONNECTIONS, " 2 "),
            (ENV_CONNECT_TIMEOUT_SECS, "3"),
            (ENV_RUN_MIGRATIONS, "false"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/data/shop.db"));
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = DbConfig::from_lookup(lookup_from(&[(ENV_MAX_CONNECTIONS, "many")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for CATALOG_DB_MAX_CONNECTIONS");

        assert!(DbConfig::from_lookup(lookup_from(&[(ENV_MAX_CONNECTIONS, "0")])).is_err());
        assert!(matches!(
            DbConfig::from_lookup(lookup_from(&[
                (ENV_MAX_CONNECTIONS, "2"),
                (ENV_MIN_CONNECTIONS, "3"),
            ])),
            Err(ConfigError::MinExceedsMax { min: 3, max: 2 })
        ));
    }
}
