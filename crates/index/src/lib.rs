//! # LSH banding index
//!
//! This crate stores MinHash signatures in `b` independent band tables so a
//! new signature can be checked against every admitted one without pairwise
//! comparison. A signature of `num_perm` values is cut into `b` bands of `r`
//! consecutive rows; two signatures become candidates as soon as one band
//! matches exactly. For Jaccard similarity `s` that happens with probability
//! `1 - (1 - s^r)^b`, an S-curve whose midpoint sits near `(1/b)^(1/r)`.
//!
//! ## Key Concepts
//!
//! - [`BandingParams`] picks `(b, r)` for a similarity threshold, or takes an
//!   explicit band count.
//! - [`BandingIndex`] is the single-owner index. Its [`BandingIndex::admit`]
//!   runs query and conditional insert as one step under `&mut self`.
//! - [`SharedIndex`] is a cloneable, thread-safe handle whose `admit` holds
//!   one lock across both steps.
//!
//! When several admitted documents collide with a query, the one inserted
//! first wins. Sentinel signatures (empty shingle sets) are never stored and
//! never match.
//!
//! ## Example Usage
//!
//! ```
//! use index::{Admission, BandingIndex, IndexConfig};
//! use perceptual::{perceptualize, PerceptualConfig};
//!
//! let pcfg = PerceptualConfig::default();
//! let mut index = BandingIndex::from_config(&IndexConfig::default(), pcfg.num_perm).unwrap();
//!
//! let a = perceptualize("the quick brown fox jumps over the lazy dog", &pcfg).unwrap();
//! let b = perceptualize("The  quick brown fox jumps over the lazy dog", &pcfg).unwrap();
//!
//! assert_eq!(index.admit("a".to_string(), a).unwrap(), Admission::Inserted);
//! assert!(matches!(
//!     index.admit("b".to_string(), b).unwrap(),
//!     Admission::Matched { canonical, .. } if canonical == "a"
//! ));
//! ```

mod banding;
mod lsh;
mod shared;

pub use banding::{band_key, BandKey, BandingParams};
pub use lsh::{Admission, BandingIndex};
pub use shared::SharedIndex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default Jaccard threshold above which documents count as near-duplicates.
pub const DEFAULT_THRESHOLD: f64 = 0.90;

/// Configuration of the banding scheme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Target Jaccard similarity, strictly between 0 and 1.
    pub threshold: f64,
    /// Explicit band count. When unset, bands are derived from `threshold`.
    pub bands: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            bands: None,
        }
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_bands(mut self, bands: usize) -> Self {
        self.bands = Some(bands);
        self
    }

    /// Check the threshold range. Band divisibility needs `num_perm` and is
    /// checked by [`BandingParams::resolve`].
    pub fn validate(&self) -> Result<(), IndexError> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(IndexError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}

/// Errors raised by the banding index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("threshold must lie strictly between 0 and 1, got {threshold}")]
    InvalidThreshold { threshold: f64 },
    #[error("num_perm must be greater than zero, got {num_perm}")]
    InvalidNumPerm { num_perm: usize },
    #[error("{bands} bands do not evenly divide {num_perm} permutations")]
    InvalidBands { bands: usize, num_perm: usize },
    #[error("signature has {got} values, index expects {expected}")]
    SignatureLength { expected: usize, got: usize },
    #[error("index lock poisoned")]
    Poisoned,
}
