//! Configuration model for a container build.
//!
//! The configuration tells the external analyzer where to scan and tells
//! the resolution engine which profiles are active and where cached
//! definitions live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CACHE_DIR, DEFAULT_PROFILE};
use crate::error::{Result, WireplanError};

/// Root configuration for a container build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireplanConfig {
    /// Directories the analyzer scans for annotated services.
    pub scan_directories: Vec<PathBuf>,
    /// Identity of the definition provider that augments scanned facts.
    pub definition_provider: Option<String>,
    /// Directory holding cached container definitions, `None` to disable caching.
    pub cache_dir: Option<PathBuf>,
    /// Profiles active for this build.
    pub profiles: Vec<String>,
}

impl Default for WireplanConfig {
    fn default() -> Self {
        Self {
            scan_directories: vec![PathBuf::from("src")],
            definition_provider: None,
            cache_dir: Some(PathBuf::from(DEFAULT_CACHE_DIR)),
            profiles: vec![DEFAULT_PROFILE.to_owned()],
        }
    }
}

impl WireplanConfig {
    /// Parses a configuration from JSON text.
    ///
    /// Missing fields take their default value.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON, or if it declares no
    /// scan directory.
    pub fn from_json(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WireplanError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.scan_directories.is_empty() {
            return Err(WireplanError::Config {
                message: "at least one scan directory must be configured".into(),
            });
        }
        if self.profiles.iter().any(String::is_empty) {
            return Err(WireplanError::Config {
                message: "profile names must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_default_profile() {
        let config = WireplanConfig::default();
        assert_eq!(config.profiles, vec!["default"]);
        assert_eq!(config.scan_directories, vec![PathBuf::from("src")]);
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = WireplanConfig::from_json(r#"{"scanDirectories": ["app", "lib"]}"#)
            .expect("should parse");
        assert_eq!(config.scan_directories.len(), 2);
        assert_eq!(config.profiles, vec!["default"]);
        assert!(config.definition_provider.is_none());
    }

    #[test]
    fn from_json_reads_all_fields() {
        let config = WireplanConfig::from_json(
            r#"{
                "scanDirectories": ["src"],
                "definitionProvider": "App\\Provider",
                "cacheDir": null,
                "profiles": ["default", "prod"]
            }"#,
        )
        .expect("should parse");
        assert_eq!(config.definition_provider.as_deref(), Some("App\\Provider"));
        assert!(config.cache_dir.is_none());
        assert_eq!(config.profiles, vec!["default", "prod"]);
    }

    #[test]
    fn from_json_rejects_empty_scan_directories() {
        let err = WireplanConfig::from_json(r#"{"scanDirectories": []}"#).unwrap_err();
        assert!(err.to_string().contains("scan directory"), "got: {err}");
    }

    #[test]
    fn from_json_rejects_empty_profile() {
        let err = WireplanConfig::from_json(r#"{"profiles": [""]}"#).unwrap_err();
        assert!(matches!(err, WireplanError::Config { .. }));
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = WireplanConfig::load(Path::new("/nonexistent/wireplan.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/wireplan.json"), "got: {err}");
    }
}
