//! Configuration types for the cleanup pipeline.
//!
//! The `version` field is part of the determinism contract: any change to
//! cleanup behavior (even a bug fix) must bump it so that decisions computed
//! over old cleanups remain explainable.
//!
//! # Examples
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.normalize_unicode);
//! assert!(config.strip_annotations);
//! assert!(!config.strip_punctuation);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the cleanup pipeline.
///
/// Serializes as:
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": true,
///   "strip_annotations": true,
///   "strip_punctuation": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CanonicalizeConfig {
    /// Semantic version of the cleanup behavior. Must be >= 1.
    pub version: u32,

    /// If true, apply Unicode NFKC normalization before other transforms.
    ///
    /// Composed and decomposed forms of the same letter ("é" as U+00E9 or as
    /// "e" + U+0301) then shingle identically.
    pub normalize_unicode: bool,

    /// If true, drop parenthetical annotations such as `(Applaudissements)`
    /// or `(Rires)`. Only the shortest `(`…`)` run confined to one line is
    /// removed; an unbalanced parenthesis is left untouched.
    pub strip_annotations: bool,

    /// If true, treat Unicode punctuation as whitespace.
    pub strip_punctuation: bool,
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            strip_annotations: true,
            strip_punctuation: false,
        }
    }
}

impl CanonicalizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    pub fn with_annotation_stripping(mut self, enabled: bool) -> Self {
        self.strip_annotations = enabled;
        self
    }

    pub fn with_punctuation_stripping(mut self, enabled: bool) -> Self {
        self.strip_punctuation = enabled;
        self
    }

    /// Version 0 is reserved and invalid.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
