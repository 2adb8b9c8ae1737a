//! Shared progress and cancellation handle for long simulation runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Live trial counters and a cancel flag for one simulation run.
///
/// Clones share the same counters, so a caller can keep one clone to poll or
/// cancel while the driver holds another.
#[derive(Debug, Clone)]
pub struct SimulationProgress {
    /// Trials evaluated so far
    completed: Arc<AtomicUsize>,
    /// Trials the run will evaluate
    total: Arc<AtomicUsize>,
    /// Set by [`Self::cancel`], polled by the driver between trials
    cancelled: Arc<AtomicBool>,
}

impl SimulationProgress {
    /// Handle for a run of `total` trials, nothing completed yet
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Completed share of the run, in `[0, 1]`
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.completed() as f64 / total as f64).min(1.0)
    }

    /// Start counting a run of `total` trials; keeps a pending cancellation
    pub(crate) fn begin(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    pub(crate) fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset the counters for a new run; clears cancellation
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Request cancellation; the driver stops before its next trial
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SimulationProgress {
    fn default() -> Self {
        Self::new(0)
    }
}
