use std::fmt;

use canonical::{CanonicalError, CanonicalizeConfig};
use index::{BandingParams, IndexConfig, IndexError};
use perceptual::{PerceptualConfig, PerceptualError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One input document. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier, expected to be unique within a run.
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Outcome for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    Kept,
    /// Near-duplicate of the named, previously kept document.
    DuplicateOf(String),
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionStatus::Kept => write!(f, "kept"),
            DecisionStatus::DuplicateOf(id) => write!(f, "duplicate_of:{id}"),
        }
    }
}

/// Decision record, produced exactly once per input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub status: DecisionStatus,
    /// False when the text was too short to be signed.
    pub signed: bool,
    /// Estimated Jaccard similarity to the canonical document. Diagnostic
    /// only; set for duplicates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl Decision {
    pub fn kept(id: impl Into<String>, signed: bool) -> Self {
        Self {
            id: id.into(),
            status: DecisionStatus::Kept,
            signed,
            similarity: None,
        }
    }

    pub fn duplicate(id: impl Into<String>, canonical: impl Into<String>, similarity: f64) -> Self {
        Self {
            id: id.into(),
            status: DecisionStatus::DuplicateOf(canonical.into()),
            signed: true,
            similarity: Some(similarity),
        }
    }

    pub fn is_kept(&self) -> bool {
        matches!(self.status, DecisionStatus::Kept)
    }

    pub fn is_duplicate(&self) -> bool {
        !self.is_kept()
    }

    /// Id of the document this one duplicates, if any.
    pub fn canonical(&self) -> Option<&str> {
        match &self.status {
            DecisionStatus::Kept => None,
            DecisionStatus::DuplicateOf(id) => Some(id),
        }
    }
}

/// Run configuration for the deduplicator.
///
/// Every field has a default, so a partial YAML or JSON document is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Configuration schema version. Must be >= 1.
    pub version: u32,
    /// Signature length.
    pub num_perm: usize,
    /// Jaccard similarity at or above which a document is dropped.
    pub threshold: f64,
    /// Tokens per shingle.
    pub shingle_size: usize,
    /// Texts with fewer characters are kept without being signed or indexed.
    pub min_text_length: usize,
    /// Seed for shingle hashing and the permutation family.
    pub seed: u64,
    /// Explicit band count, overriding the threshold-derived one.
    pub bands: Option<usize>,
    /// Parallelize the minima pass inside one signature.
    pub use_parallel: bool,
    /// Documents signed together by `process_batched`.
    pub batch_size: usize,
    /// Optional text cleanup applied before the length check.
    pub cleanup: Option<CanonicalizeConfig>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        let perceptual = PerceptualConfig::default();
        Self {
            version: 1,
            num_perm: perceptual.num_perm,
            threshold: index::DEFAULT_THRESHOLD,
            shingle_size: perceptual.shingle_size,
            min_text_length: 50,
            seed: perceptual.seed,
            bands: None,
            use_parallel: false,
            batch_size: 256,
            cleanup: None,
        }
    }
}

impl DedupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_perm(mut self, num_perm: usize) -> Self {
        self.num_perm = num_perm;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_shingle_size(mut self, shingle_size: usize) -> Self {
        self.shingle_size = shingle_size;
        self
    }

    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bands(mut self, bands: usize) -> Self {
        self.bands = Some(bands);
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_cleanup(mut self, cleanup: CanonicalizeConfig) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Signature settings derived from this config.
    pub fn perceptual_config(&self) -> PerceptualConfig {
        PerceptualConfig::new()
            .with_num_perm(self.num_perm)
            .with_shingle_size(self.shingle_size)
            .with_seed(self.seed)
            .with_parallel(self.use_parallel)
    }

    /// Banding settings derived from this config.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            threshold: self.threshold,
            bands: self.bands,
        }
    }

    /// Validate every parameter and return the resolved banding.
    pub fn validate(&self) -> Result<BandingParams, DedupError> {
        if self.version < 1 {
            return Err(DedupError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.batch_size < 1 {
            return Err(DedupError::InvalidBatchSize {
                batch_size: self.batch_size,
            });
        }
        if let Some(cleanup) = &self.cleanup {
            cleanup.validate()?;
        }
        self.perceptual_config().validate()?;
        Ok(BandingParams::resolve(&self.index_config(), self.num_perm)?)
    }
}

/// Configuration errors. Per-document anomalies never produce one.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DedupError {
    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
    #[error("invalid config: batch_size must be >= 1 (got {batch_size})")]
    InvalidBatchSize { batch_size: usize },
    #[error("cleanup: {0}")]
    Cleanup(#[from] CanonicalError),
    #[error("signature: {0}")]
    Perceptual(#[from] PerceptualError),
    #[error("index: {0}")]
    Index(#[from] IndexError),
}

/// Running counters of one deduplication run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    pub documents: u64,
    pub kept: u64,
    pub duplicates: u64,
    /// Kept documents that skipped signing because they were too short.
    pub short_texts: u64,
}

impl DedupStats {
    pub(crate) fn record(&mut self, decision: &Decision) {
        self.documents += 1;
        if decision.is_kept() {
            self.kept += 1;
        } else {
            self.duplicates += 1;
        }
        if !decision.signed {
            self.short_texts += 1;
        }
    }

    /// Documents dropped from the corpus.
    pub fn removed(&self) -> u64 {
        self.duplicates
    }
}

/// Result of [`crate::Deduplicator::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Decisions in input order, one per consumed document.
    pub decisions: Vec<Decision>,
    /// Counters for this run only.
    pub stats: DedupStats,
    /// True when the run stopped early on cancellation.
    pub cancelled: bool,
}

impl RunReport {
    /// Ids of the kept documents, in input order.
    pub fn kept_ids(&self) -> impl Iterator<Item = &str> {
        self.decisions
            .iter()
            .filter(|d| d.is_kept())
            .map(|d| d.id.as_str())
    }
}
