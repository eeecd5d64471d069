//! Configuration types for the reconciliation client.
//!
//! This module defines the structs that map to the `toadlester.yaml` manifest
//! and the explicit client configuration passed to
//! [`ToadlesterClient`](crate::toadlester::ToadlesterClient).

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::toadlester::Setting;

/// Environment variable holding the base URL.
pub const ENV_BASE_URL: &str = "TOADLESTER_URL";

/// Environment variable holding the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "TOADLESTER_TIMEOUT_SECS";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// The root manifest structure: where the service lives and what it
/// should look like.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    /// Endpoint configuration; falls back to the environment when absent.
    #[serde(default)]
    pub endpoint: Option<ClientConfig>,
    /// Desired generator settings.
    #[serde(default)]
    pub settings: Vec<Setting>,
}

/// Explicit HTTP client configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the ToadLester API (e.g. `http://localhost:8899`).
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl ClientConfig {
    /// Creates a configuration with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Builds a configuration from `TOADLESTER_URL` and the optional
    /// `TOADLESTER_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unset or the timeout is not a number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a configuration from variables resolved by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unset or the timeout is not a number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_BASE_URL).ok_or_else(|| ConfigError::MissingEnvVar {
            name: ENV_BASE_URL.to_string(),
        })?;

        let config = Self::new(base_url);
        match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => {
                let secs = raw.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                    name: ENV_TIMEOUT_SECS.to_string(),
                    value: raw.clone(),
                })?;
                Ok(config.with_timeout_secs(secs))
            }
            None => Ok(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ClientConfig::new("http://localhost:8899");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.with_timeout_secs(9).timeout_secs, 9);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn test_lookup_url_with_default_timeout() {
        let config = ClientConfig::from_lookup(vars(&[(ENV_BASE_URL, "http://toad:8899")])).unwrap();
        assert_eq!(config, ClientConfig::new("http://toad:8899"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_lookup_timeout_override() {
        let config = ClientConfig::from_lookup(vars(&[
            (ENV_BASE_URL, "http://toad:8899"),
            (ENV_TIMEOUT_SECS, " 12 "),
        ]))
        .unwrap();
        assert_eq!(config.timeout_secs, 12);
    }

    #[test]
    fn test_lookup_missing_url() {
        let err = ClientConfig::from_lookup(vars(&[(ENV_TIMEOUT_SECS, "3")])).unwrap_err();
        assert!(err.to_string().contains("Missing environment variable: TOADLESTER_URL"));
    }

    #[test]
    fn test_lookup_invalid_timeout() {
        let err = ClientConfig::from_lookup(vars(&[
            (ENV_BASE_URL, "http://toad:8899"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("TOADLESTER_TIMEOUT_SECS: soon"));
    }

    #[test]
    fn test_manifest_defaults() {
        let manifest: Manifest = serde_yaml::from_str("settings: []").unwrap();
        assert!(manifest.endpoint.is_none());
        assert!(manifest.settings.is_empty());
    }
}
