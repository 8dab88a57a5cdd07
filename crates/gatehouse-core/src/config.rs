//! Host configuration with environment variable support.
//!
//! Strategies read their settings from a [`HostConfig`], a flat string map
//! the host fills in however it likes. For deployments that configure through
//! the environment, [`HostConfig::from_env_prefixed`] collects every variable
//! under a prefix, and [`load_dotenv`] pulls in a `.env` file first.
//!
//! # Example
//!
//! ```ignore
//! use gatehouse_core::config::{load_dotenv, HostConfig};
//!
//! load_dotenv();
//!
//! // GATEHOUSE_OAUTH_CLIENT_ID=abc  ->  "oauth_client_id" => "abc"
//! let config = HostConfig::from_env_prefixed("GATEHOUSE")?;
//! assert_eq!(config.get("oauth_client_id"), Some("abc"));
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Error type for configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    EnvyError(envy::Error),
    /// A required configuration key is missing or empty.
    MissingVar(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvyError(e) => write!(f, "Configuration error: {}", e),
            ConfigError::MissingVar(var) => {
                write!(f, "Missing required configuration key: {}", var)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::EnvyError(e) => Some(e),
            ConfigError::MissingVar(_) => None,
        }
    }
}

impl From<envy::Error> for ConfigError {
    fn from(err: envy::Error) -> Self {
        ConfigError::EnvyError(err)
    }
}

/// Flat key/value configuration exposed to strategies.
///
/// Keys are lowercase snake case (`oauth_client_id`, `oauth_scopes`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct HostConfig(HashMap<String, String>);

impl HostConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a key, treating blank values as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Look up a key that must be present and non-blank.
    pub fn require(&self, key: &str) -> Result<&str, ConfigError> {
        self.get_non_empty(key)
            .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
    }

    /// Collect all environment variables starting with `{prefix}_`.
    ///
    /// The prefix is stripped and the remainder lowercased, so
    /// `GATEHOUSE_OAUTH_SCOPES` becomes `oauth_scopes`.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        Config::<HostConfig>::from_env_prefixed(prefix).map(Config::into_inner)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no keys are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HostConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Typed configuration deserialized from environment variables.
///
/// Field names map to SCREAMING_SNAKE_CASE variables via `envy`.
#[derive(Debug, Clone)]
pub struct Config<T>(pub T);

impl<T: DeserializeOwned> Config<T> {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing
    /// or if deserialization fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        envy::from_env::<T>().map(Config).map_err(ConfigError::from)
    }

    /// Load configuration from variables starting with `{prefix}_`.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        envy::prefixed(format!("{}_", prefix))
            .from_env::<T>()
            .map(Config)
            .map_err(ConfigError::from)
    }

    /// Get the inner configuration value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Load environment variables from a `.env` file in the current directory.
///
/// Missing files are ignored and existing variables take precedence.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file path.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}
