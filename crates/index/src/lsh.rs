//! The banding index itself.

use std::hash::Hash;

use hashbrown::HashMap;
use perceptual::Signature;

use crate::banding::{band_key, BandKey, BandingParams};
use crate::{IndexConfig, IndexError};

/// Outcome of [`BandingIndex::admit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Admission<K> {
    /// No admitted document collided; the signature is now indexed.
    Inserted,
    /// The signature collided with `canonical`, the earliest admitted
    /// candidate. Nothing was inserted.
    Matched {
        canonical: K,
        /// Estimated Jaccard similarity between the two signatures.
        similarity: f64,
    },
    /// Sentinel signature: neither matched nor stored.
    Unindexed,
}

/// MinHash LSH index with `b` band tables.
///
/// Each table maps a [`BandKey`] to the insertion ordinals of the documents
/// that produced it. Ordinals only grow, so every bucket stays sorted and
/// its first entry is the earliest document.
#[derive(Debug, Clone)]
pub struct BandingIndex<K = String> {
    params: BandingParams,
    tables: Vec<HashMap<BandKey, Vec<usize>>>,
    ids: Vec<K>,
    signatures: Vec<Signature>,
    ordinals: HashMap<K, usize>,
}

impl<K> BandingIndex<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(params: BandingParams) -> Self {
        Self {
            params,
            tables: (0..params.bands()).map(|_| HashMap::new()).collect(),
            ids: Vec::new(),
            signatures: Vec::new(),
            ordinals: HashMap::new(),
        }
    }

    /// Build an empty index for signatures of `num_perm` values.
    pub fn from_config(cfg: &IndexConfig, num_perm: usize) -> Result<Self, IndexError> {
        Ok(Self::new(BandingParams::resolve(cfg, num_perm)?))
    }

    pub fn params(&self) -> BandingParams {
        self.params
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Occupied buckets summed over all bands.
    pub fn bucket_count(&self) -> usize {
        self.tables.iter().map(HashMap::len).sum()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.ordinals.contains_key(id)
    }

    /// Retained signature of an indexed document.
    pub fn signature_of(&self, id: &K) -> Option<&Signature> {
        self.ordinals.get(id).map(|&ord| &self.signatures[ord])
    }

    /// Earliest indexed document sharing at least one band with `signature`.
    pub fn query(&self, signature: &Signature) -> Result<Option<&K>, IndexError> {
        Ok(self
            .earliest_candidate(signature)?
            .map(|ord| &self.ids[ord]))
    }

    /// Index `signature` under `id`.
    ///
    /// Returns `false` without touching the index when `id` is already
    /// present or the signature is a sentinel.
    pub fn insert(&mut self, id: K, signature: Signature) -> Result<bool, IndexError> {
        self.check_len(&signature)?;
        if signature.is_sentinel() || self.ordinals.contains_key(&id) {
            return Ok(false);
        }

        let ordinal = self.ids.len();
        let rows = self.params.rows();
        for (band, table) in self.tables.iter_mut().enumerate() {
            let key = band_key(band, &signature.values()[band * rows..(band + 1) * rows]);
            let bucket = table.entry(key).or_default();
            bucket.push(ordinal);
        }
        self.ordinals.insert(id.clone(), ordinal);
        self.ids.push(id);
        self.signatures.push(signature);
        Ok(true)
    }

    /// Query, then insert only when nothing collided.
    pub fn admit(&mut self, id: K, signature: Signature) -> Result<Admission<K>, IndexError> {
        self.check_len(&signature)?;
        if signature.is_sentinel() {
            return Ok(Admission::Unindexed);
        }
        if let Some(ord) = self.earliest_candidate(&signature)? {
            return Ok(Admission::Matched {
                canonical: self.ids[ord].clone(),
                similarity: self.signatures[ord].jaccard(&signature),
            });
        }
        self.insert(id, signature)?;
        Ok(Admission::Inserted)
    }

    /// Drop every indexed document, keeping the band parameters.
    pub fn clear(&mut self) {
        for table in &mut self.tables {
            table.clear();
        }
        self.ids.clear();
        self.signatures.clear();
        self.ordinals.clear();
    }

    fn earliest_candidate(&self, signature: &Signature) -> Result<Option<usize>, IndexError> {
        self.check_len(signature)?;
        if signature.is_sentinel() {
            return Ok(None);
        }

        let rows = self.params.rows();
        let mut earliest: Option<usize> = None;
        for (band, table) in self.tables.iter().enumerate() {
            let key = band_key(band, &signature.values()[band * rows..(band + 1) * rows]);
            if let Some(&first) = table.get(&key).and_then(|bucket| bucket.first()) {
                earliest = Some(earliest.map_or(first, |e| e.min(first)));
            }
        }
        Ok(earliest)
    }

    fn check_len(&self, signature: &Signature) -> Result<(), IndexError> {
        let expected = self.params.num_perm();
        if signature.len() != expected {
            return Err(IndexError::SignatureLength {
                expected,
                got: signature.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(values: &[u64]) -> Signature {
        Signature::from_values(values.to_vec())
    }

    fn one_row_index() -> BandingIndex<&'static str> {
        BandingIndex::new(BandingParams::with_bands(4, 4).expect("valid"))
    }

    #[test]
    fn empty_index_finds_nothing() {
        let index = one_row_index();
        assert_eq!(index.query(&sig(&[1, 2, 3, 4])).expect("query"), None);
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 0);
    }

    #[test]
    fn earliest_insertion_wins_ties() {
        let mut index = one_row_index();
        index.insert("a", sig(&[1, 2, 3, 4])).expect("insert");
        index.insert("b", sig(&[5, 6, 7, 8])).expect("insert");

        // Band 0 collides with b, band 1 with a.
        assert_eq!(index.query(&sig(&[5, 2, 9, 9])).expect("query"), Some(&"a"));
        assert_eq!(index.query(&sig(&[5, 6, 9, 9])).expect("query"), Some(&"b"));
        assert_eq!(index.query(&sig(&[9, 9, 9, 9])).expect("query"), None);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut index = one_row_index();
        assert!(index.insert("a", sig(&[1, 2, 3, 4])).expect("insert"));
        assert!(!index.insert("a", sig(&[1, 2, 3, 4])).expect("insert"));
        assert!(!index.insert("a", sig(&[5, 6, 7, 8])).expect("insert"));

        assert_eq!(index.len(), 1);
        assert_eq!(index.bucket_count(), 4);
        assert_eq!(index.signature_of(&"a"), Some(&sig(&[1, 2, 3, 4])));
    }

    #[test]
    fn sentinels_are_never_stored_or_matched() {
        let mut index = one_row_index();
        let sentinel = Signature::sentinel(4);

        assert!(!index.insert("empty", sentinel.clone()).expect("insert"));
        assert_eq!(index.admit("empty2", sentinel.clone()).expect("admit"), Admission::Unindexed);
        assert_eq!(index.query(&sentinel).expect("query"), None);
        assert!(index.is_empty());

        index.insert("a", sig(&[1, 2, 3, 4])).expect("insert");
        assert_eq!(index.query(&sentinel).expect("query"), None);
    }

    #[test]
    fn admit_inserts_then_matches() {
        let mut index = one_row_index();
        assert_eq!(index.admit("a", sig(&[1, 2, 3, 4])).expect("admit"), Admission::Inserted);

        match index.admit("b", sig(&[1, 2, 3, 9])).expect("admit") {
            Admission::Matched {
                canonical,
                similarity,
            } => {
                assert_eq!(canonical, "a");
                assert!((similarity - 0.75).abs() < 1e-12);
            }
            other => panic!("expected match, got {other:?}"),
        }
        // The duplicate was not indexed.
        assert!(!index.contains(&"b"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let mut index = one_row_index();
        let short = sig(&[1, 2, 3]);
        let expected = IndexError::SignatureLength {
            expected: 4,
            got: 3,
        };
        assert_eq!(index.query(&short).unwrap_err(), expected);
        assert_eq!(index.insert("a", short.clone()).unwrap_err(), expected);
        assert_eq!(index.admit("a", short).unwrap_err(), expected);
        assert!(index.is_empty());
    }

    #[test]
    fn multi_row_bands_need_the_whole_band() {
        let mut index: BandingIndex<&str> =
            BandingIndex::new(BandingParams::with_bands(2, 4).expect("valid"));
        index.insert("a", sig(&[1, 2, 3, 4])).expect("insert");

        assert_eq!(index.query(&sig(&[1, 9, 3, 9])).expect("query"), None);
        assert_eq!(index.query(&sig(&[9, 9, 3, 4])).expect("query"), Some(&"a"));
    }

    #[test]
    fn clear_keeps_params() {
        let mut index = one_row_index();
        index.insert("a", sig(&[1, 2, 3, 4])).expect("insert");
        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 0);
        assert_eq!(index.params().bands(), 4);
        assert!(index.insert("a", sig(&[1, 2, 3, 4])).expect("insert"));
    }

    #[test]
    fn from_config_uses_threshold() {
        let index: BandingIndex =
            BandingIndex::from_config(&IndexConfig::default(), 128).expect("valid");
        assert_eq!(index.params().bands(), 8);
        assert_eq!(index.params().rows(), 16);
    }
}
