use crate::error::{AdvisorError, Result};
use dashmap::DashMap;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

/// Configuration service
///
/// A shared key/value store, usually seeded from the process environment.
///
/// # Example
/// ```
/// use advisor::config::ConfigService;
///
/// let config = ConfigService::default().with("PORT", "8080");
/// assert_eq!(config.get_parsed::<u16>("PORT").unwrap(), Some(8080));
/// assert_eq!(config.get_or("HOST", "0.0.0.0"), "0.0.0.0");
/// ```
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Load every environment variable of the current process
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a value, `Ok(None)` when the key is absent
    pub fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|err| AdvisorError::InvalidConfig {
                        key: key.to_string(),
                        message: format!("{raw:?}: {err}"),
                    })
            })
            .transpose()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}
