//! Manifest parser for loading desired settings.
//!
//! This module handles loading the manifest from YAML files and the
//! `.env` file next to it.

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::manifest::Manifest;

/// Parser for `toadlester.yaml` manifests.
#[derive(Debug, Default)]
pub struct ManifestParser {
    /// Base path for resolving the `.env` file.
    base_path: Option<PathBuf>,
}

impl ManifestParser {
    /// Creates a new manifest parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path used to find `.env`.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads a manifest from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Manifest> {
        let path = path.as_ref();
        info!("Loading manifest from: {}", path.display());

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to read file: {e}"),
            location: Some(path.display().to_string()),
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses a manifest from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<Manifest> {
        debug!("Parsing YAML manifest");

        let manifest: Manifest = serde_yaml::from_str(content).map_err(|e| {
            ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            }
        })?;

        debug!("Parsed {} desired settings", manifest.settings.len());
        Ok(manifest)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to load .env file: {e}"),
                location: Some(env_path.display().to_string()),
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Default manifest file names to search for.
pub const DEFAULT_MANIFEST_FILES: &[&str] = &["toadlester.yaml", "toadlester.yml"];

/// Finds the manifest in the given directory or its parents.
///
/// A relative start directory is resolved against the working directory
/// first, so `"."` walks up through real parents.
///
/// # Errors
///
/// Returns an error if the start directory cannot be resolved or no
/// manifest is found.
pub fn find_manifest_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = std::path::absolute(start_dir.as_ref())?;
    let mut current = start.clone();

    loop {
        for filename in DEFAULT_MANIFEST_FILES {
            let candidate = current.join(filename);
            if candidate.exists() {
                info!("Found manifest: {}", candidate.display());
                return Ok(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ConfigError::FileNotFound {
        path: start.join(DEFAULT_MANIFEST_FILES[0]),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::toadlester::Setting;

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
endpoint:
  base_url: http://localhost:8899
  timeout_secs: 2
settings:
  - name: INT_SIZE
    value: "100"
    algo: up
  - name: FLOAT_MOD
    value: "1.123"
    algo: down
"#;
        let manifest = ManifestParser::new().parse_yaml(yaml, None).unwrap();
        let endpoint = manifest.endpoint.unwrap();
        assert_eq!(endpoint.base_url, "http://localhost:8899");
        assert_eq!(endpoint.timeout_secs, 2);
        assert_eq!(manifest.settings.len(), 2);
        assert_eq!(manifest.settings[0], Setting::new("INT_SIZE", "100", "up"));
    }

    #[test]
    fn test_endpoint_timeout_defaults() {
        let yaml = "endpoint:\n  base_url: http://toad\n";
        let manifest = ManifestParser::new().parse_yaml(yaml, None).unwrap();
        assert_eq!(manifest.endpoint.unwrap().timeout_secs, 5);
    }

    #[test]
    fn test_parse_error_reported() {
        let err = ManifestParser::new()
            .parse_yaml("settings: {name: [", None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ManifestParser::new()
            .load_file(dir.path().join("toadlester.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("Manifest file not found"));
    }

    #[test]
    fn test_find_manifest_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("toadlester.yaml"), "settings: []\n").unwrap();

        let found = find_manifest_file(&nested).unwrap();
        assert_eq!(found, dir.path().join("toadlester.yaml"));

        let manifest = ManifestParser::new().load_file(&found).unwrap();
        assert!(manifest.settings.is_empty());
    }

    #[test]
    fn test_find_manifest_from_relative_start() {
        let cwd = std::env::current_dir().unwrap();
        let dir = tempfile::tempdir_in(&cwd).unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("toadlester.yaml"), "settings: []\n").unwrap();

        let relative = dir.path().strip_prefix(&cwd).unwrap().join("a").join(".");
        assert!(relative.is_relative());

        let found = find_manifest_file(&relative).unwrap();
        assert!(found.is_absolute());
        assert_eq!(found, dir.path().join("toadlester.yaml"));
    }
}
