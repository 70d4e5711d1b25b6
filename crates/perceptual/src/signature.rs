//! The MinHash signature type.
//!
//! A signature is the only per-document state the similarity index keeps, so
//! its layout is part of the public contract: any incompatible change must
//! come with a new `PERCEPTUAL_VERSION`.

use serde::{Deserialize, Serialize};

/// Fixed-length MinHash signature, one minimum per hash permutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature {
    values: Vec<u64>,
}

impl Signature {
    /// Wrap raw minima. The caller is responsible for using the same
    /// permutation family as the rest of the run.
    pub fn from_values(values: Vec<u64>) -> Self {
        Self { values }
    }

    /// The all-`u64::MAX` signature of an empty shingle set.
    pub fn sentinel(num_perm: usize) -> Self {
        Self {
            values: vec![u64::MAX; num_perm],
        }
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when no shingle contributed to the signature. Sentinel
    /// signatures never match anything, not even each other.
    pub fn is_sentinel(&self) -> bool {
        self.values.iter().all(|&v| v == u64::MAX)
    }

    /// Slice of `rows` consecutive values making up band `band`.
    ///
    /// Returns `None` if the band lies outside the signature.
    pub fn band(&self, band: usize, rows: usize) -> Option<&[u64]> {
        let start = band.checked_mul(rows)?;
        let end = start.checked_add(rows)?;
        self.values.get(start..end)
    }

    /// Estimated Jaccard similarity: the fraction of positions that agree.
    ///
    /// Signatures of different lengths, and sentinel signatures, estimate 0.
    pub fn jaccard(&self, other: &Signature) -> f64 {
        if self.values.len() != other.values.len()
            || self.values.is_empty()
            || self.is_sentinel()
            || other.is_sentinel()
        {
            return 0.0;
        }
        let matches = self
            .values
            .iter()
            .zip(other.values.iter())
            .filter(|(a, b)| a == b)
            .count();
        matches as f64 / self.values.len() as f64
    }
}

impl From<Vec<u64>> for Signature {
    fn from(values: Vec<u64>) -> Self {
        Self::from_values(values)
    }
}
