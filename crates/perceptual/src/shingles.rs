//! Token n-gram shingling.
//!
//! Text is lower-cased and split on Unicode whitespace; every contiguous run
//! of `k` tokens becomes one shingle whose canonical form is the tokens
//! joined by a single ASCII space. Punctuation stays attached to its token,
//! so `"pays."` and `"pays"` are different tokens.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64_with_seed;

/// The set of distinct shingles of one document.
///
/// Iteration order is lexicographic so that anything derived from a set
/// (debug output, hashes) is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShingleSet {
    shingles: BTreeSet<String>,
}

impl ShingleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shingles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shingles.is_empty()
    }

    pub fn contains(&self, shingle: &str) -> bool {
        self.shingles.contains(shingle)
    }

    pub fn insert(&mut self, shingle: impl Into<String>) -> bool {
        self.shingles.insert(shingle.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.shingles.iter().map(String::as_str)
    }

    /// Seeded 64-bit hashes of every shingle, sorted and unique.
    pub fn hashes(&self, seed: u64) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.shingles.len());
        out.extend(self.shingles.iter().map(|s| hash_shingle(s, seed)));
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Exact Jaccard similarity `|A ∩ B| / |A ∪ B|`. Two empty sets give 0.
    pub fn jaccard(&self, other: &ShingleSet) -> f64 {
        let intersection = self.shingles.intersection(&other.shingles).count();
        let union = self.shingles.len() + other.shingles.len() - intersection;
        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ShingleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            shingles: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Extract the shingle set of `text`.
///
/// Returns an empty set when `k == 0` or the text has fewer than `k` tokens.
pub fn extract_shingles(text: &str, k: usize) -> ShingleSet {
    if k == 0 {
        return ShingleSet::new();
    }
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.len() < k {
        return ShingleSet::new();
    }

    tokens.windows(k).map(|window| window.join(" ")).collect()
}

/// Hash a canonical shingle string with xxh3.
#[inline]
pub fn hash_shingle(shingle: &str, seed: u64) -> u64 {
    xxh3_64_with_seed(shingle.as_bytes(), seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_shingles() {
        assert!(extract_shingles("", 3).is_empty());
    }

    #[test]
    fn k_zero_has_no_shingles() {
        assert!(extract_shingles("a b c d", 0).is_empty());
    }

    #[test]
    fn fewer_tokens_than_k() {
        assert!(extract_shingles("deux mots", 3).is_empty());
    }

    #[test]
    fn exact_k_tokens_gives_one_shingle() {
        let set = extract_shingles("un deux trois", 3);
        assert_eq!(set.len(), 1);
        assert!(set.contains("un deux trois"));
    }

    #[test]
    fn lowercases_and_joins_with_single_space() {
        let set = extract_shingles("Le  Président\ta\n dit", 3);
        let shingles: Vec<&str> = set.iter().collect();
        assert_eq!(shingles, vec!["le président a", "président a dit"]);
    }

    #[test]
    fn produces_n_minus_k_plus_one_distinct_shingles() {
        let set = extract_shingles("a b c d e", 3);
        assert_eq!(set.len(), 3);
        assert!(set.contains("a b c"));
        assert!(set.contains("b c d"));
        assert!(set.contains("c d e"));
    }

    #[test]
    fn repeated_windows_collapse() {
        let set = extract_shingles("la la la la la", 3);
        assert_eq!(set.len(), 1);
        assert!(set.contains("la la la"));
    }

    #[test]
    fn punctuation_stays_attached() {
        let set = extract_shingles("pour le pays.", 3);
        assert!(set.contains("pour le pays."));
        assert!(!set.contains("pour le pays"));
    }

    #[test]
    fn deterministic_extraction() {
        let text = "the quick brown fox jumps over the lazy dog";
        assert_eq!(extract_shingles(text, 3), extract_shingles(text, 3));
    }

    #[test]
    fn hashes_are_sorted_unique_and_seeded() {
        let set = extract_shingles("a b c d e f g", 3);
        let h1 = set.hashes(1);
        let h2 = set.hashes(2);

        assert_eq!(h1.len(), set.len());
        assert!(h1.windows(2).all(|w| w[0] < w[1]));
        assert_ne!(h1, h2);
        assert_eq!(h1, set.hashes(1));
    }

    #[test]
    fn exact_jaccard() {
        let a: ShingleSet = ["x", "y", "z"].into_iter().collect();
        let b: ShingleSet = ["y", "z", "w"].into_iter().collect();
        assert!((a.jaccard(&b) - 0.5).abs() < 1e-12);
        assert!((a.jaccard(&a) - 1.0).abs() < 1e-12);
        assert_eq!(ShingleSet::new().jaccard(&ShingleSet::new()), 0.0);
    }

    #[test]
    fn insert_reports_novelty() {
        let mut set = ShingleSet::new();
        assert!(set.insert("a b c"));
        assert!(!set.insert("a b c"));
        assert_eq!(set.len(), 1);
    }
}
