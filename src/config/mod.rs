//! Configuration module for the reconciliation client.
//!
//! This module handles all configuration-related functionality:
//! - The explicit [`ClientConfig`] (base URL, timeout), from code or the environment
//! - Parsing and deserializing `toadlester.yaml` manifests
//! - Validation of desired settings before they reach the reconciler

mod manifest;
mod parser;
mod validator;

pub use manifest::{
    ClientConfig, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_TIMEOUT_SECS, Manifest,
};
pub use parser::{DEFAULT_MANIFEST_FILES, ManifestParser, find_manifest_file};
pub use validator::{
    KNOWN_ALGOS, KNOWN_GENERATOR_TYPES, MAX_FIELD_LEN, SettingValidator, ValidationError,
    ValidationResult,
};
