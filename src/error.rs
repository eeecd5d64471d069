//! Error types for the ToadLester reconciliation client.
//!
//! Four kinds of failure matter to a host driving the reconciler:
//! the remote service was unreachable (transport), a reseed response did
//! not echo the requested setting (validation), a read response was not a
//! snapshot (parse), or the snapshot had no entry for the setting (drift).
//! Configuration and IO errors come from the manifest and CLI layers.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the reconciliation client.
#[derive(Debug, Error)]
pub enum ToadlesterError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// ToadLester API errors.
    #[error("ToadLester API error: {0}")]
    Api(#[from] ApiError),

    /// Reconciliation errors.
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The manifest file was not found.
    #[error("Manifest file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The manifest could not be parsed.
    #[error("Failed to parse manifest: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Environment variable is missing.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },

    /// Environment variable holds an unusable value.
    #[error("Invalid value for environment variable {name}: {value}")]
    InvalidEnvVar {
        /// Name of the variable.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// Errors raised while talking to the ToadLester API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be built, sent, completed in time, or its body
    /// could not be read.
    #[error("Transport error for {url}: {message}")]
    Transport {
        /// Request URL.
        url: String,
        /// Description of the failure.
        message: String,
    },
}

/// Errors raised while interpreting responses.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A reseed response did not echo every field of the requested setting.
    #[error("API response missing expected values {missing:?} for '{name}': got {body:?}")]
    Validation {
        /// Setting name.
        name: String,
        /// Tokens absent from the response.
        missing: Vec<String>,
        /// Raw response body.
        body: String,
    },

    /// A read response was not a flat JSON object of strings.
    #[error("Failed to parse snapshot: {message} (body: {body:?})")]
    Parse {
        /// Decoder message.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The snapshot has no entry for the requested setting.
    #[error("Configuration missing expected key: '{name}'")]
    Drift {
        /// Setting name that was not found.
        name: String,
        /// Raw response body.
        body: String,
    },
}

/// Flat classification of [`ToadlesterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Remote service unreachable or unreadable.
    Transport,
    /// Reseed response did not echo the setting.
    Validation,
    /// Read response was not a snapshot.
    Parse,
    /// Setting missing from the snapshot.
    Drift,
    /// Manifest, environment or validation problem.
    Config,
    /// Local IO failure.
    Io,
    /// Anything else.
    Internal,
}

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, ToadlesterError>;

impl ToadlesterError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the flat kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Api(ApiError::Transport { .. }) => ErrorKind::Transport,
            Self::Reconcile(ReconcileError::Validation { .. }) => ErrorKind::Validation,
            Self::Reconcile(ReconcileError::Parse { .. }) => ErrorKind::Parse,
            Self::Reconcile(ReconcileError::Drift { .. }) => ErrorKind::Drift,
            Self::Io(_) => ErrorKind::Io,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns true if the remote service has no record of the setting.
    #[must_use]
    pub const fn is_drift(&self) -> bool {
        matches!(self.kind(), ErrorKind::Drift)
    }

    /// Returns true if a host may reasonably retry the operation.
    ///
    /// This crate never retries on its own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport)
    }

    /// Returns the raw response body attached to this error, if any.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Reconcile(
                ReconcileError::Validation { body, .. }
                | ReconcileError::Parse { body, .. }
                | ReconcileError::Drift { body, .. },
            ) => Some(body.as_str()),
            _ => None,
        }
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ApiError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }
}
