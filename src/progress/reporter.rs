//! Progress reporter implementation
//!
//! A single indicatif bar counting finished jobs. Clones share the same bar,
//! so each worker can hold its own handle.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{spinner:.cyan} {prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} jobs ({percent}%, ETA {eta}) {msg}";

/// Progress reporter for hashing runs
#[derive(Clone)]
pub struct ProgressReporter {
    /// Job count bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter drawing to stderr
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar }
    }

    /// Set total jobs
    pub fn set_total_jobs(&self, total: u64) {
        self.bar.set_length(total);
    }

    /// Increment finished jobs
    pub fn increment_jobs(&self, count: u64) {
        self.bar.inc(count);
    }

    /// Label the bar
    pub fn set_current(&self, label: &str) {
        self.bar.set_prefix(label.to_string());
    }

    /// Finish progress with success message
    pub fn finish_success(&self, message: &str) {
        self.bar.finish_with_message(format!("✓ {}", message));
    }

    /// Finish progress with error message
    pub fn finish_error(&self, message: &str) {
        self.bar.abandon_with_message(format!("✗ {}", message));
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_bar() {
        let reporter = ProgressReporter::new();
        reporter.set_total_jobs(10);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let worker = reporter.clone();
                std::thread::spawn(move || worker.increment_jobs(2))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(reporter.bar.position(), 8);
        reporter.finish_success("8 sources hashed");
    }

    #[test]
    fn test_finish_keeps_position() {
        let reporter = ProgressReporter::new();
        reporter.set_total_jobs(2);
        reporter.set_current("crc32");
        reporter.increment_jobs(2);
        reporter.finish_error("1 of 2 sources failed");
        assert_eq!(reporter.bar.position(), 2);
    }
}
