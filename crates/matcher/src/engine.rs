use std::borrow::Borrow;
use std::sync::Arc;
use std::time::Instant;

use index::{Admission, BandingIndex, BandingParams};
use perceptual::Signature;
use rayon::prelude::*;
use tracing::{debug, info, warn, Level};

use crate::cancel::CancellationFlag;
use crate::metrics::{DedupMetrics, MetricsSpan};
use crate::signer::Signer;
use crate::types::{Decision, DedupConfig, DedupError, DedupStats, Document, RunReport};


/// Streaming near-duplicate filter.
///
/// Owns its banding index for the lifetime of a run. Each document is
/// cleaned, length-checked, signed and admitted in one step, so the decision
/// for document `n` depends only on documents `0..n`.
pub struct Deduplicator {
    cfg: DedupConfig,
    signer: Signer,
    index: BandingIndex<String>,
    stats: DedupStats,
    metrics: Option<Arc<dyn DedupMetrics>>,
}

impl Deduplicator {
    /// Validate `cfg` and build an empty index.
    pub fn new(cfg: DedupConfig) -> Result<Self, DedupError> {
        let params = cfg.validate()?;
        debug!(
            bands = params.bands(),
            rows = params.rows(),
            threshold = cfg.threshold,
            estimated_threshold = params.threshold_estimate(),
            "dedup_ready"
        );
        Ok(Self {
            signer: Signer::new(&cfg),
            index: BandingIndex::new(params),
            cfg,
            stats: DedupStats::default(),
            metrics: None,
        })
    }

    /// Report every decision and run to `recorder`.
    pub fn with_metrics(mut self, recorder: Arc<dyn DedupMetrics>) -> Self {
        self.metrics = Some(recorder);
        self
    }

    pub fn config(&self) -> &DedupConfig {
        &self.cfg
    }

    pub fn params(&self) -> BandingParams {
        self.index.params()
    }

    /// Read-only view of the admitted documents.
    pub fn index(&self) -> &BandingIndex<String> {
        &self.index
    }

    /// Counters accumulated since construction or the last [`reset`](Self::reset).
    pub fn stats(&self) -> DedupStats {
        self.stats
    }

    /// Forget every admitted document and zero the counters.
    pub fn reset(&mut self) {
        self.index.clear();
        self.stats = DedupStats::default();
    }

    /// Signature of `text` under this run's settings, or `None` for texts
    /// shorter than `min_text_length`.
    pub fn sign(&self, text: &str) -> Option<Signature> {
        self.signer.sign(text)
    }

    /// Decide one document.
    pub fn process(&mut self, doc: &Document) -> Decision {
        let start = Instant::now();
        let metrics = MetricsSpan::start(self.metrics.as_ref());
        let signature = self.signer.sign(&doc.text);
        self.commit(doc, signature, start, metrics)
    }

    /// Decide every document, in input order.
    pub fn process_all<I, D>(&mut self, docs: I) -> Vec<Decision>
    where
        I: IntoIterator<Item = D>,
        D: Borrow<Document>,
    {
        docs.into_iter()
            .map(|doc| self.process(doc.borrow()))
            .collect()
    }

    /// Lazily decide documents as they are pulled from `docs`.
    pub fn decisions<'a, I, D>(&'a mut self, docs: I) -> impl Iterator<Item = Decision> + 'a
    where
        I: IntoIterator<Item = D> + 'a,
        I::IntoIter: 'a,
        D: Borrow<Document> + 'a,
    {
        docs.into_iter().map(move |doc| self.process(doc.borrow()))
    }

    /// Sign each `batch_size` chunk in parallel, then admit sequentially in
    /// input order. Produces the same decisions as [`process_all`](Self::process_all).
    pub fn process_batched<I, D>(&mut self, docs: I) -> Vec<Decision>
    where
        I: IntoIterator<Item = D>,
        D: Borrow<Document> + Sync,
    {
        let never = CancellationFlag::new();
        self.batched(docs, &never).0
    }

    /// Sequential run with cancellation checked before every document.
    pub fn run<I, D>(&mut self, docs: I, cancel: &CancellationFlag) -> RunReport
    where
        I: IntoIterator<Item = D>,
        D: Borrow<Document>,
    {
        let span = tracing::span!(Level::INFO, "dedup.run", mode = "sequential");
        let _guard = span.enter();
        let start = Instant::now();
        let metrics = MetricsSpan::start(self.metrics.as_ref());
        let before = self.stats;

        let mut decisions = Vec::new();
        let mut cancelled = false;
        for doc in docs {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            decisions.push(self.process(doc.borrow()));
        }

        self.finish_run(decisions, before, cancelled, start, metrics)
    }

    /// Batched run with cancellation checked before every batch.
    pub fn run_batched<I, D>(&mut self, docs: I, cancel: &CancellationFlag) -> RunReport
    where
        I: IntoIterator<Item = D>,
        D: Borrow<Document> + Sync,
    {
        let span = tracing::span!(
            Level::INFO,
            "dedup.run",
            mode = "batched",
            batch_size = self.cfg.batch_size
        );
        let _guard = span.enter();
        let start = Instant::now();
        let metrics = MetricsSpan::start(self.metrics.as_ref());
        let before = self.stats;

        let (decisions, cancelled) = self.batched(docs, cancel);
        self.finish_run(decisions, before, cancelled, start, metrics)
    }

    fn batched<I, D>(&mut self, docs: I, cancel: &CancellationFlag) -> (Vec<Decision>, bool)
    where
        I: IntoIterator<Item = D>,
        D: Borrow<Document> + Sync,
    {
        let batch_size = self.cfg.batch_size;
        let mut decisions = Vec::new();
        let mut batch: Vec<D> = Vec::with_capacity(batch_size);
        let mut docs = docs.into_iter();

        loop {
            if cancel.is_cancelled() {
                return (decisions, true);
            }
            batch.clear();
            batch.extend(docs.by_ref().take(batch_size));
            if batch.is_empty() {
                return (decisions, false);
            }
            self.commit_batch(&batch, &mut decisions);
        }
    }

    fn commit_batch<D>(&mut self, batch: &[D], out: &mut Vec<Decision>)
    where
        D: Borrow<Document> + Sync,
    {
        let signer = &self.signer;
        let signatures: Vec<Option<Signature>> = batch
            .par_iter()
            .map(|doc| signer.sign(&doc.borrow().text))
            .collect();

        out.reserve(batch.len());
        for (doc, signature) in batch.iter().zip(signatures) {
            let start = Instant::now();
            let metrics = MetricsSpan::start(self.metrics.as_ref());
            out.push(self.commit(doc.borrow(), signature, start, metrics));
        }
    }

    fn commit(
        &mut self,
        doc: &Document,
        signature: Option<Signature>,
        start: Instant,
        metrics: Option<MetricsSpan>,
    ) -> Decision {
        let decision = match signature {
            None => Decision::kept(doc.id.as_str(), false),
            Some(signature) => match self.index.admit(doc.id.clone(), signature) {
                Ok(Admission::Inserted) | Ok(Admission::Unindexed) => {
                    Decision::kept(doc.id.as_str(), true)
                }
                Ok(Admission::Matched {
                    canonical,
                    similarity,
                }) => Decision::duplicate(doc.id.as_str(), canonical, similarity),
                Err(err) => {
                    // Signer and index are built from one config.
                    warn!(doc_id = %doc.id, error = %err, "dedup_admit_failed");
                    Decision::kept(doc.id.as_str(), true)
                }
            },
        };

        self.stats.record(&decision);
        let elapsed_micros = start.elapsed().as_micros();
        debug!(
            doc_id = %decision.id,
            status = %decision.status,
            signed = decision.signed,
            similarity = ?decision.similarity,
            elapsed_micros,
            "dedup_decision"
        );
        if let Some(span) = metrics {
            span.record_decision(&decision.status);
        }
        decision
    }

    fn finish_run(
        &self,
        decisions: Vec<Decision>,
        before: DedupStats,
        cancelled: bool,
        start: Instant,
        metrics: Option<MetricsSpan>,
    ) -> RunReport {
        let stats = DedupStats {
            documents: self.stats.documents - before.documents,
            kept: self.stats.kept - before.kept,
            duplicates: self.stats.duplicates - before.duplicates,
            short_texts: self.stats.short_texts - before.short_texts,
        };
        let elapsed_micros = start.elapsed().as_micros();

        if cancelled {
            warn!(
                documents = stats.documents,
                kept = stats.kept,
                duplicates = stats.duplicates,
                elapsed_micros,
                "dedup_cancelled"
            );
        }
        info!(
            documents = stats.documents,
            kept = stats.kept,
            duplicates = stats.duplicates,
            short_texts = stats.short_texts,
            removed = stats.removed(),
            indexed = self.index.len(),
            elapsed_micros,
            "Deduplication finished. Removed {} documents.",
            stats.removed()
        );
        if let Some(span) = metrics {
            span.record_run(&stats, cancelled);
        }

        RunReport {
            decisions,
            stats,
            cancelled,
        }
    }
}
