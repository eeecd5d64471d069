//! Validation of desired settings.
//!
//! The reconciler trusts its inputs, so every setting passes through here
//! first: the same bounds a host schema would enforce, plus manifest-wide
//! checks.

use crate::error::{ConfigError, Result};
use std::collections::HashSet;
use tracing::debug;

use super::manifest::Manifest;
use crate::toadlester::Setting;

/// Maximum length of `name` and `value`.
pub const MAX_FIELD_LEN: usize = 20;

/// Allowed length range of `algo`.
const ALGO_LEN: std::ops::RangeInclusive<usize> = 2..=4;

/// Read directions the service understands.
pub const KNOWN_ALGOS: &[&str] = &["up", "down"];

/// Generator types the service ships with.
pub const KNOWN_GENERATOR_TYPES: &[&str] = &["INT", "FLOAT", "EXP", "RAND"];

/// Validator for settings and manifests.
#[derive(Debug, Default)]
pub struct SettingValidator;

/// Validation result containing everything found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl SettingValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a single setting.
    ///
    /// # Errors
    ///
    /// Returns the first error found.
    pub fn validate_setting(&self, setting: &Setting) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();
        Self::check_setting(setting, "setting", &mut result);
        Self::finish(result)
    }

    /// Validates every setting in a manifest.
    ///
    /// # Errors
    ///
    /// Returns the first error found.
    pub fn validate_manifest(&self, manifest: &Manifest) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        if let Some(endpoint) = &manifest.endpoint {
            if endpoint.base_url.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: String::from("endpoint.base_url"),
                    message: String::from("Base URL cannot be empty"),
                });
            }
            if endpoint.timeout_secs == 0 {
                result.errors.push(ValidationError {
                    field: String::from("endpoint.timeout_secs"),
                    message: String::from("Timeout must be at least 1 second"),
                });
            }
        }

        if manifest.settings.is_empty() {
            result.warnings.push(String::from("No settings defined in manifest"));
        }

        let mut seen_names = HashSet::new();
        for (i, setting) in manifest.settings.iter().enumerate() {
            let prefix = format!("settings[{i}]");

            // One resource per name
            if !seen_names.insert(setting.name.as_str()) {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.name"),
                    message: format!("Duplicate setting name: {}", setting.name),
                });
            }

            Self::check_setting(setting, &prefix, &mut result);
        }

        Self::finish(result)
    }

    fn check_setting(setting: &Setting, prefix: &str, result: &mut ValidationResult) {
        Self::check_len(&setting.name, 1..=MAX_FIELD_LEN, &format!("{prefix}.name"), result);
        Self::check_len(&setting.value, 1..=MAX_FIELD_LEN, &format!("{prefix}.value"), result);
        Self::check_len(&setting.algo, ALGO_LEN, &format!("{prefix}.algo"), result);

        if ALGO_LEN.contains(&setting.algo.chars().count())
            && !KNOWN_ALGOS.contains(&setting.algo.as_str())
        {
            result.errors.push(ValidationError {
                field: format!("{prefix}.algo"),
                message: format!(
                    "Unknown algorithm '{}'. Expected one of: {}",
                    setting.algo,
                    KNOWN_ALGOS.join(", ")
                ),
            });
        }

        if !setting.name.is_empty() {
            let generator = setting.name.split('_').next().unwrap_or_default();
            if !KNOWN_GENERATOR_TYPES.contains(&generator) {
                result.warnings.push(format!(
                    "{prefix}.name: Unknown generator type '{generator}' in '{}'",
                    setting.name
                ));
            } else if !setting.name.contains('_') {
                result.warnings.push(format!(
                    "{prefix}.name: '{}' does not follow <TYPE>_<FIELD>",
                    setting.name
                ));
            }
        }

        if !setting.value.is_empty() && setting.value.parse::<f64>().is_err() {
            result.warnings.push(format!(
                "{prefix}.value: '{}' is not numeric",
                setting.value
            ));
        }
    }

    fn check_len(
        field: &str,
        bounds: std::ops::RangeInclusive<usize>,
        path: &str,
        result: &mut ValidationResult,
    ) {
        let len = field.chars().count();
        if !bounds.contains(&len) {
            result.errors.push(ValidationError {
                field: path.to_string(),
                message: format!(
                    "Expected length between {} and {}, got {len}",
                    bounds.start(),
                    bounds.end()
                ),
            });
        }
    }

    fn finish(result: ValidationResult) -> Result<ValidationResult> {
        match result.errors.first() {
            None => {
                debug!("Validation passed with {} warnings", result.warnings.len());
                Ok(result)
            }
            Some(first_error) => Err(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )
            .into()),
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
