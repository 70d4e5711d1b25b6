//! MinHash computation.
//!
//! Fixed-length MinHash signatures over sets of shingle hashes. The
//! permutation family is derived from a single 64-bit seed: slot `j` uses the
//! key `splitmix64(seed + j * φ)` and the permutation `mix_u64(x, key)`.
//! Every shingle hash is visited once and updates all `num_perm` minima.

use rayon::prelude::*;
use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::PerceptualConfig;
use crate::signature::Signature;

/// Shingle hashes handed to one rayon task in parallel mode.
const PAR_CHUNK: usize = 64;

/// Compute a MinHash signature (parallel if `cfg.use_parallel = true`).
///
/// An empty input yields the sentinel signature. Parallel and sequential
/// modes are bit-identical since the element-wise minimum is associative
/// and commutative.
pub fn minhash_signature(unique_shingles: &[u64], cfg: &PerceptualConfig) -> Signature {
    let m = cfg.num_perm;
    if unique_shingles.is_empty() {
        return Signature::sentinel(m);
    }

    let keys = permutation_keys(m, cfg.seed);

    let minima = if cfg.use_parallel && unique_shingles.len() > PAR_CHUNK {
        unique_shingles
            .par_chunks(PAR_CHUNK)
            .map(|chunk| fold_minima(chunk, &keys))
            .reduce(|| vec![u64::MAX; m], merge_minima)
    } else {
        fold_minima(unique_shingles, &keys)
    };

    Signature::from_values(minima)
}

/// One key per permutation slot.
pub(crate) fn permutation_keys(m: usize, seed: u64) -> Vec<u64> {
    let mut keys = Vec::with_capacity(m);
    keys.extend((0..m).map(|j| {
        let step = (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        splitmix64(seed.wrapping_add(step))
    }));
    keys
}

/// Single pass over `shingles`, keeping the running minimum of every slot.
fn fold_minima(shingles: &[u64], keys: &[u64]) -> Vec<u64> {
    let mut minima = vec![u64::MAX; keys.len()];
    for &val in shingles {
        for (slot, &key) in minima.iter_mut().zip(keys) {
            let h = mix_u64(val, key);
            if h < *slot {
                *slot = h;
            }
        }
    }
    minima
}

fn merge_minima(mut left: Vec<u64>, right: Vec<u64>) -> Vec<u64> {
    for (l, r) in left.iter_mut().zip(right) {
        if r < *l {
            *l = r;
        }
    }
    left
}

/// A mixing function to create a new hash from an existing one.
#[inline]
pub(crate) fn mix_u64(x: u64, key: u64) -> u64 {
    // xxh3 keyed by the slot, then the murmur3 finalizer.
    let mut h = xxh3_64_with_seed(&x.to_le_bytes(), key);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^ (h >> 33)
}

/// A 64-bit hash function that is fast and has good distribution.
#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
