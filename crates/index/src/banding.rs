//! Band parameters and band keys.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::{IndexConfig, IndexError};

/// Fingerprint of one band of a signature, salted by the band number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BandKey(pub u64);

/// Hash the `rows` values of one band, seeding with the band number so
/// equal slices in different bands never share a key.
pub fn band_key(band: usize, rows: &[u64]) -> BandKey {
    let mut hasher = Xxh3::with_seed(band as u64);
    for value in rows {
        hasher.update(&value.to_le_bytes());
    }
    BandKey(hasher.digest())
}

/// Number of bands `b` and rows per band `r`, with `b * r == num_perm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandingParams {
    bands: usize,
    rows: usize,
}

impl BandingParams {
    /// Choose `(b, r)` whose S-curve midpoint `(1/b)^(1/r)` lies closest to
    /// `threshold`. Ties go to the smaller `b`.
    pub fn for_threshold(threshold: f64, num_perm: usize) -> Result<Self, IndexError> {
        IndexConfig::new().with_threshold(threshold).validate()?;
        if num_perm == 0 {
            return Err(IndexError::InvalidNumPerm { num_perm });
        }

        let mut best = Self {
            bands: 1,
            rows: num_perm,
        };
        let mut best_error = (threshold - best.threshold_estimate()).abs();
        for bands in 2..=num_perm {
            if num_perm % bands != 0 {
                continue;
            }
            let candidate = Self {
                bands,
                rows: num_perm / bands,
            };
            let error = (threshold - candidate.threshold_estimate()).abs();
            if error < best_error {
                best = candidate;
                best_error = error;
            }
        }
        Ok(best)
    }

    /// Use exactly `bands` bands.
    pub fn with_bands(bands: usize, num_perm: usize) -> Result<Self, IndexError> {
        if num_perm == 0 {
            return Err(IndexError::InvalidNumPerm { num_perm });
        }
        if bands == 0 || num_perm % bands != 0 {
            return Err(IndexError::InvalidBands { bands, num_perm });
        }
        Ok(Self {
            bands,
            rows: num_perm / bands,
        })
    }

    /// Parameters for `cfg`: the explicit band count if set, otherwise the
    /// best fit for the threshold. The threshold is validated either way.
    pub fn resolve(cfg: &IndexConfig, num_perm: usize) -> Result<Self, IndexError> {
        cfg.validate()?;
        match cfg.bands {
            Some(bands) => Self::with_bands(bands, num_perm),
            None => Self::for_threshold(cfg.threshold, num_perm),
        }
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn num_perm(&self) -> usize {
        self.bands * self.rows
    }

    /// Similarity at which the collision curve is steepest, `(1/b)^(1/r)`.
    pub fn threshold_estimate(&self) -> f64 {
        (1.0 / self.bands as f64).powf(1.0 / self.rows as f64)
    }

    /// Probability that two signatures with Jaccard similarity `s` share at
    /// least one band: `1 - (1 - s^r)^b`.
    pub fn collision_probability(&self, similarity: f64) -> f64 {
        let s = similarity.clamp(0.0, 1.0);
        1.0 - (1.0 - s.powi(self.rows as i32)).powi(self.bands as i32)
    }
}
