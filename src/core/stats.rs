//! Live counters shared between workers and the caller

use super::HashReport;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Pipeline statistics, updated by workers as jobs finish
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Total jobs submitted
    pub jobs_submitted: AtomicU64,
    /// Jobs that produced a digest
    pub jobs_completed: AtomicU64,
    /// Jobs that recorded a failure
    pub jobs_failed: AtomicU64,
    /// Jobs currently being hashed
    pub jobs_in_progress: AtomicUsize,
    /// Total bytes fed into hashers
    pub bytes_hashed: AtomicU64,
}

impl PipelineStats {
    /// Mark a job as picked up by a worker
    pub fn record_start(&self) {
        self.jobs_in_progress.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished job
    pub fn record_report(&self, report: &HashReport) {
        if report.is_success() {
            self.jobs_completed.fetch_add(1, Ordering::Relaxed);
            self.bytes_hashed.fetch_add(report.bytes, Ordering::Relaxed);
        } else {
            self.jobs_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.jobs_in_progress.fetch_sub(1, Ordering::Relaxed);
    }

    /// Jobs finished so far, successful or not
    pub fn jobs_finished(&self) -> u64 {
        self.jobs_completed.load(Ordering::Relaxed) + self.jobs_failed.load(Ordering::Relaxed)
    }
}
