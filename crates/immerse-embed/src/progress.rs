//! Progress reporting for long rasterization passes.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bounds::IndexBounds;

/// Receives progress events from an embedding pass.
///
/// Events may arrive from several worker threads at once and `advance` calls
/// are not ordered, but `done` counts are unique and the last one equals
/// `total`.
pub trait Progress: Sync {
    /// Called once with the index range about to be rasterized.
    fn begin(&self, _bounds: &IndexBounds) {}

    /// Called after each z-slab; `done` of `total` slabs are finished.
    fn advance(&self, _done: usize, _total: usize) {}

    /// Called once when the pass is complete.
    fn finish(&self) {}
}

/// Discards all progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {}

/// Writes progress to the `log` facade in 10% steps.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    reported: AtomicUsize,
}

impl LogProgress {
    /// Report progress under `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reported: AtomicUsize::new(0),
        }
    }
}

impl Progress for LogProgress {
    fn begin(&self, bounds: &IndexBounds) {
        self.reported.store(0, Ordering::Relaxed);
        log::debug!("{}: working range (indices) {}", self.label, bounds);
    }

    fn advance(&self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        let step = done * 10 / total;
        if self.reported.fetch_max(step, Ordering::Relaxed) < step {
            log::debug!("{}: {}% of slabs done", self.label, step * 10);
        }
    }

    fn finish(&self) {
        log::debug!("{}: done", self.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_steps_are_monotonic() {
        let progress = LogProgress::new("test");
        progress.begin(&IndexBounds { x: 0..1, y: 0..1, z: 0..20 });
        for done in [3, 1, 20, 10] {
            progress.advance(done, 20);
        }
        assert_eq!(progress.reported.load(Ordering::Relaxed), 10);
        progress.finish();
    }

    #[test]
    fn test_zero_total_is_ignored() {
        let progress = LogProgress::new("empty");
        progress.advance(0, 0);
        assert_eq!(progress.reported.load(Ordering::Relaxed), 0);
    }
}
