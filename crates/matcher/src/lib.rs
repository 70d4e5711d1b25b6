//! # Admission controller (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` drives a stream of documents through the near-duplicate engine
//! and partitions it into kept documents and duplicates of an earlier kept
//! document. Per document it runs:
//!
//! 1. optional cleanup (`canonical`),
//! 2. the length check: texts shorter than `min_text_length` characters are
//!    kept without being signed or indexed,
//! 3. shingling and MinHash signing (`perceptual`),
//! 4. admission against the LSH banding index (`index`), i.e. query and
//!    conditional insert as one step.
//!
//! Decisions come out in input order, and the same ordered input with the
//! same [`DedupConfig`] always yields the same decisions.
//!
//! ## Core Types
//!
//! - [`Document`]: id + raw text.
//! - [`Decision`] / [`DecisionStatus`]: `Kept` or `DuplicateOf(id)`.
//! - [`DedupConfig`]: all tuning knobs, validated once by the constructors.
//! - [`Deduplicator`]: single-owner controller with sequential, lazy,
//!   batched-parallel and cancellable entry points.
//! - [`ConcurrentDeduplicator`]: `Send + Sync` handle for multi-threaded
//!   producers.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{DecisionStatus, DedupConfig, Deduplicator, Document};
//!
//! let mut dedup = Deduplicator::new(DedupConfig::default()).expect("valid config");
//! let docs = [
//!     Document::new("1", "Le président a dit que la réforme est nécessaire pour le pays."),
//!     Document::new("2", "LE PRÉSIDENT a dit que la réforme est nécessaire   pour le pays."),
//!     Document::new("3", "Court."),
//! ];
//!
//! let decisions = dedup.process_all(&docs);
//! assert_eq!(decisions[0].status, DecisionStatus::Kept);
//! assert_eq!(decisions[1].status, DecisionStatus::DuplicateOf("1".into()));
//! assert_eq!(decisions[2].status, DecisionStatus::Kept);
//! ```
//!
//! ## Observability
//!
//! Decisions are logged with `tracing` at debug level and each `run` ends
//! with an info-level summary. Attach a [`DedupMetrics`] implementation with
//! `with_metrics` to record per-decision latency.

mod cancel;
pub mod concurrent;
pub mod engine;
pub mod metrics;
mod signer;
pub mod types;

pub use crate::cancel::CancellationFlag;
pub use crate::concurrent::ConcurrentDeduplicator;
pub use crate::engine::Deduplicator;
pub use crate::metrics::DedupMetrics;
pub use crate::types::{
    Decision, DecisionStatus, DedupConfig, DedupError, DedupStats, Document, RunReport,
};
