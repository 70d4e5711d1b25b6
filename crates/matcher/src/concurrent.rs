//! Multi-threaded admission over one shared index.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use index::{Admission, BandingParams, SharedIndex};
use tracing::debug;

use crate::metrics::{DedupMetrics, MetricsSpan};
use crate::signer::Signer;
use crate::types::{Decision, DedupConfig, DedupError, DedupStats, Document};

#[derive(Debug, Default)]
struct Counters {
    documents: AtomicU64,
    kept: AtomicU64,
    duplicates: AtomicU64,
    short_texts: AtomicU64,
}

impl Counters {
    fn record(&self, decision: &Decision) {
        self.documents.fetch_add(1, Ordering::Relaxed);
        if decision.is_kept() {
            self.kept.fetch_add(1, Ordering::Relaxed);
        } else {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
        }
        if !decision.signed {
            self.short_texts.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn snapshot(&self) -> DedupStats {
        DedupStats {
            documents: self.documents.load(Ordering::Relaxed),
            kept: self.kept.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            short_texts: self.short_texts.load(Ordering::Relaxed),
        }
    }
}

/// Cloneable deduplicator for callers feeding documents from many threads.
///
/// Signing runs on the calling thread without any lock; only the admission
/// step holds the index mutex. Among concurrent near-duplicates, the one
/// admitted first becomes the canonical document, so results depend on
/// arrival order rather than input order.
#[derive(Clone)]
pub struct ConcurrentDeduplicator {
    signer: Arc<Signer>,
    index: SharedIndex<String>,
    counters: Arc<Counters>,
    metrics: Option<Arc<dyn DedupMetrics>>,
}

impl ConcurrentDeduplicator {
    pub fn new(cfg: DedupConfig) -> Result<Self, DedupError> {
        let params = cfg.validate()?;
        Ok(Self {
            signer: Arc::new(Signer::new(&cfg)),
            index: SharedIndex::new(index::BandingIndex::new(params)),
            counters: Arc::new(Counters::default()),
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, recorder: Arc<dyn DedupMetrics>) -> Self {
        self.metrics = Some(recorder);
        self
    }

    pub fn params(&self) -> BandingParams {
        self.index.params()
    }

    /// Decide one document. Fails only if another thread panicked while
    /// holding the index.
    pub fn process(&self, doc: &Document) -> Result<Decision, DedupError> {
        let start = Instant::now();
        let metrics = MetricsSpan::start(self.metrics.as_ref());

        let decision = match self.signer.sign(&doc.text) {
            None => Decision::kept(doc.id.as_str(), false),
            Some(signature) => match self.index.admit(doc.id.clone(), signature)? {
                Admission::Inserted | Admission::Unindexed => Decision::kept(doc.id.as_str(), true),
                Admission::Matched {
                    canonical,
                    similarity,
                } => Decision::duplicate(doc.id.as_str(), canonical, similarity),
            },
        };

        self.counters.record(&decision);
        let elapsed_micros = start.elapsed().as_micros();
        debug!(
            doc_id = %decision.id,
            status = %decision.status,
            signed = decision.signed,
            elapsed_micros,
            "dedup_decision"
        );
        if let Some(span) = metrics {
            span.record_decision(&decision.status);
        }
        Ok(decision)
    }

    /// Counters summed over every handle.
    pub fn stats(&self) -> DedupStats {
        self.counters.snapshot()
    }

    /// Number of documents currently indexed.
    pub fn indexed(&self) -> Result<usize, DedupError> {
        Ok(self.index.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Texts for different `i` share no token.
    fn text(i: usize) -> String {
        [
            "le", "conseil", "municipal", "de", "la", "commune", "a", "voté", "le", "budget",
            "annuel", "hier", "soir",
        ]
        .iter()
        .map(|w| format!("{w}-{i}"))
        .collect::<Vec<_>>()
        .join(" ")
    }

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConcurrentDeduplicator>();
    }

    #[test]
    fn copies_from_many_threads_keep_exactly_one() {
        let dedup = ConcurrentDeduplicator::new(DedupConfig::default()).expect("valid");
        let body = text(1);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let dedup = dedup.clone();
                let body = body.clone();
                thread::spawn(move || {
                    (0..4)
                        .map(|i| {
                            dedup
                                .process(&Document::new(format!("t{t}-{i}"), body.clone()))
                                .expect("process")
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let decisions: Vec<Decision> = handles
            .into_iter()
            .flat_map(|h| h.join().expect("thread panicked"))
            .collect();

        let kept: Vec<&Decision> = decisions.iter().filter(|d| d.is_kept()).collect();
        assert_eq!(kept.len(), 1);
        let canonical = kept[0].id.as_str();
        assert!(decisions
            .iter()
            .filter(|d| d.is_duplicate())
            .all(|d| d.canonical() == Some(canonical)));

        let stats = dedup.stats();
        assert_eq!(stats.documents, 32);
        assert_eq!(stats.kept, 1);
        assert_eq!(stats.duplicates, 31);
        assert_eq!(dedup.indexed().expect("indexed"), 1);
    }

    #[test]
    fn distinct_documents_are_all_kept() {
        let dedup = ConcurrentDeduplicator::new(DedupConfig::default()).expect("valid");
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let dedup = dedup.clone();
                thread::spawn(move || {
                    for i in 0..10 {
                        let n = t * 100 + i;
                        let doc = Document::new(n.to_string(), text(n));
                        assert!(dedup.process(&doc).expect("process").is_kept());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread panicked");
        }
        assert_eq!(dedup.stats().kept, 40);
    }

    #[test]
    fn short_texts_bypass_the_index() {
        let dedup = ConcurrentDeduplicator::new(DedupConfig::default()).expect("valid");
        let d = dedup.process(&Document::new("a", "trop court")).expect("process");
        assert!(d.is_kept());
        assert!(!d.signed);
        assert_eq!(dedup.indexed().expect("indexed"), 0);
    }
}
