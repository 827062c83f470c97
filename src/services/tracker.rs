// src/services/tracker.rs

//! Early-stop heuristic for the enumerator.
//!
//! The UID space has no advertised upper bound, so the run stops once enough
//! consecutive UIDs come back 404. Workers update the counter concurrently
//! and a success on one worker can reset a streak another worker is
//! building, so the exact stopping point varies between runs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared consecutive-404 counter and stop flag.
#[derive(Debug)]
pub struct NotFoundTracker {
    threshold: usize,
    consecutive: AtomicUsize,
    stop: AtomicBool,
}

impl NotFoundTracker {
    /// Stop after `threshold` consecutive not-found responses.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
        }
    }

    /// Count a 404. Returns `true` if this call tripped the stop flag.
    pub fn record_not_found(&self) -> bool {
        let count = self.consecutive.fetch_add(1, Ordering::SeqCst) + 1;
        if count >= self.threshold && !self.stop.swap(true, Ordering::SeqCst) {
            log::info!(
                "{} consecutive users not found, stopping enumeration",
                self.threshold
            );
            return true;
        }
        false
    }

    /// Reset the streak after an accepted profile.
    pub fn record_success(&self) {
        self.consecutive.store(0, Ordering::SeqCst);
    }

    /// Whether workers should stop picking up UIDs.
    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Current streak length.
    pub fn consecutive(&self) -> usize {
        self.consecutive.load(Ordering::SeqCst)
    }
}
