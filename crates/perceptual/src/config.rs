//! Configuration and error types for shingling and MinHash signatures.
//!
//! This module defines the public configuration surface for the signature
//! layer. It is intentionally free of any I/O or environment-dependent
//! behavior so that a signature is a pure function of `(text, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for shingle extraction and MinHash signature building.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerceptualConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect a signature must bump this
    /// version, so that old decisions remain replayable.
    pub version: u32,
    /// Number of tokens per shingle (token n-gram length).
    pub shingle_size: usize,
    /// Signature length, i.e. the number of hash permutations.
    pub num_perm: usize,
    /// Seed for shingle hashing and for deriving the permutation family.
    ///
    /// Two configs sharing the seed and all other parameters produce
    /// bit-identical signatures for the same text.
    pub seed: u64,
    /// Spread the per-shingle minima updates across rayon workers.
    pub use_parallel: bool,
}

impl PerceptualConfig {
    /// Create a new configuration with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shingle size. Larger values are stricter about word order.
    pub fn with_shingle_size(mut self, shingle_size: usize) -> Self {
        self.shingle_size = shingle_size;
        self
    }

    /// Set the number of permutations (signature length).
    /// More permutations give a tighter Jaccard estimate at linear cost.
    pub fn with_num_perm(mut self, num_perm: usize) -> Self {
        self.num_perm = num_perm;
        self
    }

    /// Set the random seed for reproducible results.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable parallel signature computation.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.version < 1 {
            return Err(PerceptualError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.shingle_size < 1 {
            return Err(PerceptualError::InvalidConfigShingleSize {
                shingle_size: self.shingle_size,
            });
        }
        if self.num_perm < 1 {
            return Err(PerceptualError::InvalidConfigNumPerm {
                num_perm: self.num_perm,
            });
        }
        Ok(())
    }
}

impl Default for PerceptualConfig {
    fn default() -> Self {
        Self {
            version: 1,
            shingle_size: 3,
            num_perm: 128,
            seed: 0xF00D_BAAD_F00D_BAAD,
            use_parallel: false,
        }
    }
}

/// Errors returned by the signature layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("invalid config: shingle_size must be >= 1 (got {shingle_size})")]
    InvalidConfigShingleSize { shingle_size: usize },

    #[error("invalid config: num_perm must be >= 1 (got {num_perm})")]
    InvalidConfigNumPerm { num_perm: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
