use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Run-level cancellation shared between a controller and whoever stops it.
///
/// Checked between documents, or between batches in batched mode. A
/// document that has started is always finished.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
