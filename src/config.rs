// ⚙️ Configuration - environment + optional .env file

use secrecy::SecretString;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_GEOCODE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error("{name} is set but empty")]
    Empty { name: &'static str },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Google Maps key, used for geocoding and map embeds
    pub maps_api_key: Option<SecretString>,
    pub geocode_base_url: String,
    pub geocode_timeout: Duration,
    pub server_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            maps_api_key: None,
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_string(),
            geocode_timeout: Duration::from_secs(DEFAULT_GEOCODE_TIMEOUT_SECS),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Load `.env` (if there is one) and read settings from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!("Ignoring unreadable .env file: {}", e);
            }
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any key/value source; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(key) = lookup("GOOGLE_MAPS_API_KEY") {
            if key.trim().is_empty() {
                return Err(ConfigError::Empty {
                    name: "GOOGLE_MAPS_API_KEY",
                });
            }
            config.maps_api_key = Some(SecretString::from(key.trim().to_string()));
        }

        if let Some(url) = lookup("GEOCODE_BASE_URL") {
            if url.trim().is_empty() {
                return Err(ConfigError::Empty {
                    name: "GEOCODE_BASE_URL",
                });
            }
            config.geocode_base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup("GEOCODE_TIMEOUT_SECS") {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    name: "GEOCODE_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.geocode_timeout = Duration::from_secs(secs);
        }

        if let Some(addr) = lookup("HOUSE_SERVER_ADDR") {
            if addr.trim().is_empty() {
                return Err(ConfigError::Empty {
                    name: "HOUSE_SERVER_ADDR",
                });
            }
            config.server_addr = addr.trim().to_string();
        }

        Ok(config)
    }
}

/// Install the tracing subscriber used by the binaries (`RUST_LOG` wins)
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("house_estimator=info"));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.maps_api_key.is_none());
        assert_eq!(config.geocode_base_url, DEFAULT_GEOCODE_BASE_URL);
        assert_eq!(config.geocode_timeout, Duration::from_secs(10));
        assert_eq!(config.server_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("GOOGLE_MAPS_API_KEY", " abc123 "),
            ("GEOCODE_BASE_URL", "http://localhost:9999/geocode"),
            ("GEOCODE_TIMEOUT_SECS", "3"),
            ("HOUSE_SERVER_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();

        assert_eq!(config.maps_api_key.unwrap().expose_secret(), "abc123");
        assert_eq!(config.geocode_base_url, "http://localhost:9999/geocode");
        assert_eq!(config.geocode_timeout, Duration::from_secs(3));
        assert_eq!(config.server_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("GEOCODE_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("GEOCODE_TIMEOUT_SECS", "0")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("GOOGLE_MAPS_API_KEY", "  ")])),
            Err(ConfigError::Empty { .. })
        ));
    }
}
