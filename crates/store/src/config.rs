use std::time::Duration;

/// Error raised for a missing or malformed configuration variable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Store configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Postgres connection string (`DATABASE_URL`).
    pub database_url: Option<String>,
    /// Connection pool size (default: `20`).
    pub max_connections: u32,
    /// Upper bound on every gateway call (default: `30s`).
    pub gateway_timeout: Duration,
    /// Change-notification buffer (default: `1024`).
    pub event_bus_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 20,
            gateway_timeout: Duration::from_secs(30),
            event_bus_capacity: greenlog_events::bus::DEFAULT_CAPACITY,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `DATABASE_URL`         | none    |
    /// | `DB_MAX_CONNECTIONS`   | `20`    |
    /// | `GATEWAY_TIMEOUT_SECS` | `30`    |
    /// | `EVENT_BUS_CAPACITY`   | `1024`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let max_connections =
            parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), defaults.max_connections)?;
        let timeout_secs = parse_or(
            "GATEWAY_TIMEOUT_SECS",
            lookup("GATEWAY_TIMEOUT_SECS"),
            defaults.gateway_timeout.as_secs(),
        )?;
        let event_bus_capacity = parse_or(
            "EVENT_BUS_CAPACITY",
            lookup("EVENT_BUS_CAPACITY"),
            defaults.event_bus_capacity,
        )?;

        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "GATEWAY_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            database_url,
            max_connections,
            gateway_timeout: Duration::from_secs(timeout_secs),
            event_bus_capacity,
        })
    }

    /// The database URL, required to talk to Postgres.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::Missing("DATABASE_URL"))
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => Err(ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.gateway_timeout, Duration::from_secs(30));
        assert_eq!(config.event_bus_capacity, 1024);
        assert!(config.require_database_url().is_err());
    }

    #[test]
    fn values_are_read_from_source() {
        let config = StoreConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/greenlog"),
            ("GATEWAY_TIMEOUT_SECS", "5"),
            ("DB_MAX_CONNECTIONS", " 4 "),
        ]))
        .unwrap();
        assert_eq!(config.gateway_timeout, Duration::from_secs(5));
        assert_eq!(config.max_connections, 4);
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://localhost/greenlog"
        );
    }

    #[test]
    fn malformed_value_is_reported() {
        let err = StoreConfig::from_lookup(lookup(&[("GATEWAY_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "GATEWAY_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(StoreConfig::from_lookup(lookup(&[("GATEWAY_TIMEOUT_SECS", "0")])).is_err());
    }
}
