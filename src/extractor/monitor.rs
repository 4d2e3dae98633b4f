//! Traversal monitoring and cancellation
//!
//! A traversal runs to completion without suspension points. Interactive
//! callers that need to abort a long fill, or to show progress, pass a
//! [`TraversalMonitor`] that is polled once per frontier step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Number of newly visited voxels between progress notifications
pub const PROGRESS_STRIDE: u64 = 4096;

/// Hooks polled by a running traversal
pub trait TraversalMonitor {
    /// Polled once per dequeued voxel; returning true aborts the traversal
    fn should_stop(&self) -> bool {
        false
    }

    /// Called every [`PROGRESS_STRIDE`] visited voxels
    fn on_progress(&self, _visited: u64) {}
}

/// Monitor that never interferes
pub struct Unmonitored;

impl TraversalMonitor for Unmonitored {}

/// Shared stop flag
///
/// Clones observe the same flag, so one clone can be handed to the
/// traversal while another is cancelled from a different thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl TraversalMonitor for CancellationToken {
    fn should_stop(&self) -> bool {
        self.is_cancelled()
    }
}
