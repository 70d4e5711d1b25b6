// Metrics hooks for the admission controller.
//
// A `DedupMetrics` implementation is attached to one deduplicator with
// `with_metrics`; the controller then reports the latency and outcome of every
// decision and a summary at the end of each run.
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::{DecisionStatus, DedupStats};

/// Metrics observer for deduplication.
pub trait DedupMetrics: Send + Sync {
    /// Record one decision. `latency` covers cleanup, signing and admission
    /// of a single document.
    fn record_decision(&self, latency: Duration, status: &DecisionStatus);

    /// Record the end of a run started with `run` or `run_batched`.
    fn record_run(&self, _latency: Duration, _stats: &DedupStats, _cancelled: bool) {}
}

/// Latency measurement bound to a recorder.
pub(crate) struct MetricsSpan {
    recorder: Arc<dyn DedupMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start(recorder: Option<&Arc<dyn DedupMetrics>>) -> Option<Self> {
        recorder.map(|recorder| Self {
            recorder: Arc::clone(recorder),
            start: Instant::now(),
        })
    }

    pub(crate) fn record_decision(self, status: &DecisionStatus) {
        self.recorder
            .record_decision(self.start.elapsed(), status);
    }

    pub(crate) fn record_run(self, stats: &DedupStats, cancelled: bool) {
        self.recorder
            .record_run(self.start.elapsed(), stats, cancelled);
    }
}
