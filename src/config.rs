//! YAML configuration file support.
//!
//! A run can be described by one YAML file instead of a long command line.
//! Every `dedup` field is optional and falls back to its default.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "archives-1980-2020"
//!
//! dedup:
//!   threshold: 0.9
//!   num_perm: 128
//!   shingle_size: 3
//!   min_text_length: 50
//!   seed: 17297687000019483309
//!   batch_size: 256
//!   cleanup:
//!     normalize_unicode: true
//!     strip_annotations: true
//! ```

use std::fs;
use std::path::Path;

use matcher::{DedupConfig, DedupError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(#[from] DedupError),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupFileConfig {
    /// Configuration format version, `"1"` or `"1.0"`.
    pub version: String,

    /// Optional run name, only used in logs.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub dedup: DedupConfig,
}

impl Default for DedupFileConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            dedup: DedupConfig::default(),
        }
    }
}

impl DedupFileConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: DedupFileConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => {}
            v => return Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }
        self.dedup.validate()?;
        Ok(())
    }

    /// Serialize back to YAML, e.g. to record the effective settings of a run.
    pub fn to_yaml(&self) -> Result<String, ConfigLoadError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn minimal_file_uses_defaults() {
        let cfg = DedupFileConfig::from_yaml("version: \"1\"\n").expect("valid");
        assert_eq!(cfg.dedup, DedupConfig::default());
        assert_eq!(cfg.name, None);
    }

    #[test]
    fn partial_dedup_section_overrides_only_given_fields() {
        let yaml = r#"
version: "1.0"
name: "test"
dedup:
  threshold: 0.8
  bands: 16
  cleanup:
    strip_punctuation: true
"#;
        let cfg = DedupFileConfig::from_yaml(yaml).expect("valid");
        assert_eq!(cfg.name.as_deref(), Some("test"));
        assert_eq!(cfg.dedup.threshold, 0.8);
        assert_eq!(cfg.dedup.bands, Some(16));
        assert_eq!(cfg.dedup.num_perm, 128);
        let cleanup = cfg.dedup.cleanup.expect("cleanup section");
        assert!(cleanup.strip_punctuation);
        assert!(cleanup.strip_annotations);
    }

    #[test]
    fn unsupported_version_rejected() {
        let err = DedupFileConfig::from_yaml("version: \"2\"\n").expect_err("invalid");
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2"));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = DedupFileConfig::from_yaml("version: \"1\"\ndedup:\n  threshold: 1.5\n")
            .expect_err("invalid");
        assert!(matches!(err, ConfigLoadError::Validation(_)));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = DedupFileConfig::from_yaml("version: [unterminated").expect_err("invalid");
        assert!(matches!(err, ConfigLoadError::YamlParse(_)));
    }

    #[test]
    fn missing_version_is_a_parse_error() {
        let err = DedupFileConfig::from_yaml("dedup:\n  threshold: 0.5\n").expect_err("invalid");
        assert!(matches!(err, ConfigLoadError::YamlParse(_)));
    }

    #[test]
    fn loads_from_file_and_round_trips() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "version: \"1\"\ndedup:\n  min_text_length: 10").expect("write");

        let cfg = DedupFileConfig::from_file(file.path()).expect("valid");
        assert_eq!(cfg.dedup.min_text_length, 10);

        let again = DedupFileConfig::from_yaml(&cfg.to_yaml().expect("yaml")).expect("valid");
        assert_eq!(again, cfg);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = DedupFileConfig::from_file("/definitely/not/here.yaml").expect_err("missing");
        assert!(matches!(err, ConfigLoadError::FileRead(_)));
    }
}
