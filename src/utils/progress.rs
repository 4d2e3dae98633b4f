//! Progress display for long-running operations

use indicatif::{ProgressBar, ProgressStyle};

use crate::extractor::{CancellationToken, TraversalMonitor};

pub struct ProgressTracker {
    bar: ProgressBar,
    cancel: Option<CancellationToken>,
}

impl ProgressTracker {
    /// Spinner for work of unknown size, such as a flood fill
    pub fn spinner(description: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} voxels {msg}") {
            bar.set_style(style);
        }
        bar.set_message(description.to_string());

        ProgressTracker { bar, cancel: None }
    }

    /// Hidden tracker, for quiet runs and tests
    pub fn hidden() -> Self {
        ProgressTracker { bar: ProgressBar::hidden(), cancel: None }
    }

    /// Stop any traversal monitored by this tracker once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Completed");
    }
}

impl TraversalMonitor for ProgressTracker {
    fn should_stop(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| token.is_cancelled())
    }

    fn on_progress(&self, visited: u64) {
        self.bar.set_position(visited);
    }
}
