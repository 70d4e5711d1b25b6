//! Workspace umbrella crate for near-duplicate corpus deduplication.
//!
//! This crate re-exports the four layers of the engine so callers depend on
//! a single crate:
//!
//! - `canonical`: optional text cleanup,
//! - `perceptual`: shingles and MinHash signatures,
//! - `index`: the LSH banding index,
//! - `matcher`: the admission controller that turns a document stream into
//!   `Kept` / `DuplicateOf` decisions.
//!
//! It also owns the ambient pieces: the YAML configuration file
//! ([`config`]), JSON Lines I/O ([`jsonl`]) and the `corpus-dedup` binary.
//!
//! ```
//! use corpus_dedup::{deduplicate, DedupConfig, Document};
//!
//! let docs = vec![
//!     Document::new("a", "the quick brown fox jumps over the lazy dog near the river bank"),
//!     Document::new("b", "The quick brown fox jumps over the lazy dog near the river bank"),
//! ];
//! let report = deduplicate(&docs, DedupConfig::default()).unwrap();
//! assert_eq!(report.kept_ids().collect::<Vec<_>>(), vec!["a"]);
//! assert_eq!(report.stats.removed(), 1);
//! ```

pub mod config;
pub mod jsonl;

pub use canonical::{apply_cleanup, canonicalize_text, CanonicalError, CanonicalizeConfig};
pub use config::{ConfigLoadError, DedupFileConfig};
pub use index::{Admission, BandingIndex, BandingParams, IndexConfig, IndexError, SharedIndex};
pub use matcher::{
    CancellationFlag, ConcurrentDeduplicator, Decision, DecisionStatus, DedupConfig, DedupError,
    DedupMetrics, DedupStats, Deduplicator, Document, RunReport,
};
pub use perceptual::{
    build_signature, extract_shingles, perceptualize, PerceptualConfig, PerceptualError,
    ShingleSet, Signature,
};

use std::borrow::Borrow;

/// Deduplicate `docs` in one sequential run with a fresh index.
pub fn deduplicate<I, D>(docs: I, cfg: DedupConfig) -> Result<RunReport, DedupError>
where
    I: IntoIterator<Item = D>,
    D: Borrow<Document>,
{
    let mut dedup = Deduplicator::new(cfg)?;
    Ok(dedup.run(docs, &CancellationFlag::new()))
}
