//! # Shingles and MinHash signatures
//!
//! This crate turns raw document text into a compact, similarity-preserving
//! signature. Two documents whose shingle sets have Jaccard similarity `J`
//! agree, in expectation, on a fraction `J` of their signature positions.
//!
//! ## Contract
//!
//! - The API is a pure function of `(text, config)` with no I/O, no network,
//!   and no reliance on clocks or global process state.
//! - Signatures are reproducible across runs and machines for the same text
//!   and [`PerceptualConfig`].
//!
//! ## Core Pipeline
//!
//! 1.  **Shingling**: the text is lower-cased, split on whitespace, and every
//!     run of `shingle_size` tokens becomes one shingle (see
//!     [`extract_shingles`]).
//! 2.  **Hashing**: each distinct shingle is hashed with seeded xxh3.
//! 3.  **MinHashing**: one pass over the hashes keeps, for each of the
//!     `num_perm` permutations, the minimum permuted value. Optional rayon
//!     parallelism splits the pass over worker threads.
//!
//! A text without a single complete shingle gets the sentinel signature
//! (all `u64::MAX`), which never matches anything.
//!
//! ## Example Usage
//!
//! ```
//! use perceptual::{perceptualize, PerceptualConfig};
//!
//! let config = PerceptualConfig::default();
//! let a = perceptualize("the quick brown fox jumps over the lazy dog", &config).unwrap();
//! let b = perceptualize("The quick brown fox jumps over the lazy dog", &config).unwrap();
//!
//! assert_eq!(a.len(), 128);
//! assert_eq!(a, b);
//! ```

pub mod config;
mod minhash;
mod shingles;
pub mod signature;

pub use crate::config::{PerceptualConfig, PerceptualError};
pub use crate::minhash::minhash_signature;
pub use crate::shingles::{extract_shingles, hash_shingle, ShingleSet};
pub use crate::signature::Signature;

/// Current signature algorithm version for this crate.
pub const PERCEPTUAL_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const PERCEPTUAL_ALGORITHM: &str = "xxh3shingle_minhash_v1";

/// Build the signature of an already extracted shingle set.
///
/// The configuration is assumed valid; an empty set yields the sentinel
/// signature.
pub fn build_signature(shingles: &ShingleSet, cfg: &PerceptualConfig) -> Signature {
    let hashes = shingles.hashes(cfg.seed);
    minhash_signature(&hashes, cfg)
}

/// Validate the configuration, then shingle and sign `text`.
pub fn perceptualize(text: &str, cfg: &PerceptualConfig) -> Result<Signature, PerceptualError> {
    cfg.validate()?;
    let shingles = extract_shingles(text, cfg.shingle_size);
    Ok(build_signature(&shingles, cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perceptualize_rejects_invalid_config() {
        let cfg = PerceptualConfig::new().with_num_perm(0);
        assert!(matches!(
            perceptualize("some text here", &cfg),
            Err(PerceptualError::InvalidConfigNumPerm { num_perm: 0 })
        ));
    }

    #[test]
    fn short_text_gets_sentinel() {
        let sig = perceptualize("deux mots", &PerceptualConfig::default()).expect("valid");
        assert!(sig.is_sentinel());
        assert_eq!(sig.len(), 128);
    }

    #[test]
    fn self_similarity_is_one() {
        let cfg = PerceptualConfig::default();
        let text = "Le président a dit que la réforme est nécessaire pour le pays.";
        let a = perceptualize(text, &cfg).expect("valid");
        let b = perceptualize(text, &cfg).expect("valid");
        assert_eq!(a.jaccard(&b), 1.0);
    }

    #[test]
    fn build_signature_matches_perceptualize() {
        let cfg = PerceptualConfig::default();
        let text = "one two three four five six";
        let shingles = extract_shingles(text, cfg.shingle_size);
        assert_eq!(
            build_signature(&shingles, &cfg),
            perceptualize(text, &cfg).expect("valid")
        );
    }

    #[test]
    fn whitespace_and_case_do_not_change_signature() {
        let cfg = PerceptualConfig::default();
        let a = perceptualize("Alpha beta GAMMA delta", &cfg).expect("valid");
        let b = perceptualize("  alpha\nbeta   gamma\tdelta ", &cfg).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn unrelated_texts_rarely_agree() {
        let cfg = PerceptualConfig::default();
        let a = perceptualize("the cat sat on the mat today", &cfg).expect("valid");
        let b = perceptualize("markets rallied after the central bank decision", &cfg)
            .expect("valid");
        assert!(a.jaccard(&b) < 0.1);
    }
}
