//! Value types exchanged with the ToadLester API.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ReconcileError, Result};

/// One unit of desired generator configuration.
///
/// `name` is the generator variable (e.g. `INT_SIZE`), `value` the text the
/// generator is reseeded with, `algo` the direction the series is read in
/// (`up` or `down`). Bounds are enforced by
/// [`SettingValidator`](crate::config::SettingValidator), not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Setting {
    /// Generator variable name, `<TYPE>_<FIELD>`.
    pub name: String,
    /// Value used to reseed the generator.
    pub value: String,
    /// Read direction.
    pub algo: String,
}

impl Setting {
    /// Creates a new setting.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, algo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            algo: algo.into(),
        }
    }

    /// Returns the lower-cased generator type: the part of `name` before the
    /// first underscore (`INT_SIZE` → `int`).
    #[must_use]
    pub fn generator_type(&self) -> String {
        self.name
            .split('_')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// Returns a copy of this setting with `value` replaced.
    #[must_use]
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            value: value.into(),
            algo: self.algo.clone(),
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.name, self.value, self.algo)
    }
}

/// Current generator readings keyed by variable name.
///
/// Built fresh from every read response and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteConfigSnapshot(BTreeMap<String, String>);

impl RemoteConfigSnapshot {
    /// Decodes a read response body.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Parse`] if the body is not a flat JSON
    /// object of string values.
    pub fn parse(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            ReconcileError::Parse {
                message: e.to_string(),
                body: body.to_string(),
            }
            .into()
        })
    }

    /// Gets the current value for a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the number of variables in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the snapshot has no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consumes the snapshot, returning the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for RemoteConfigSnapshot {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, String)> for RemoteConfigSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Health of the ToadLester service as seen from `/metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Probed URL.
    pub url: String,
    /// Whether the probe returned a success status.
    pub healthy: bool,
    /// HTTP status code (if a response arrived).
    pub status_code: Option<u16>,
    /// Response time in milliseconds.
    pub response_time_ms: Option<u64>,
    /// Error message (if any).
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_generator_type() {
        assert_eq!(Setting::new("INT_SIZE", "1", "up").generator_type(), "int");
        assert_eq!(Setting::new("FLOAT_MOD", "1.1", "up").generator_type(), "float");
        assert_eq!(Setting::new("RAND", "1", "up").generator_type(), "rand");
        assert_eq!(Setting::default().generator_type(), "");
    }

    #[test]
    fn test_with_value_keeps_name_and_algo() {
        let desired = Setting::new("INT_SIZE", "100", "down");
        let observed = desired.with_value("42");
        assert_eq!(observed, Setting::new("INT_SIZE", "42", "down"));
    }

    #[test]
    fn test_parse_snapshot() {
        let snapshot = RemoteConfigSnapshot::parse(r#"{"INT_SIZE": "42", "EXP_TAIL": "1"}"#)
            .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("INT_SIZE"), Some("42"));
        assert_eq!(snapshot.get("RAND_MOD"), None);
        let names: Vec<_> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["EXP_TAIL", "INT_SIZE"]);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = RemoteConfigSnapshot::parse("Metric_int_up: 42").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.response_body(), Some("Metric_int_up: 42"));
    }

    #[test]
    fn test_parse_rejects_non_string_values() {
        let err = RemoteConfigSnapshot::parse(r#"{"INT_SIZE": 42}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = RemoteConfigSnapshot::parse(r#"["INT_SIZE"]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
