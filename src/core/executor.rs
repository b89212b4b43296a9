//! Per-job execution: open the source, stream it into a hasher

use super::{HashJob, HashReport, JobFailure, SourceId};
use crate::hash::{hash_reader, Digest, HashAlgorithm, DEFAULT_READ_BUFFER};
use std::fs::File;
use std::io;
use std::time::Instant;

/// Turns one job into exactly one report.
///
/// Implementations must never panic on I/O trouble; failures belong in the
/// returned report.
pub trait JobExecutor: Send + Sync {
    /// Run the job to completion
    fn execute(&self, job: HashJob) -> HashReport;
}

/// Executor that hashes files (or standard input) from disk
#[derive(Debug, Clone)]
pub struct FileHasher {
    buffer_size: usize,
}

impl FileHasher {
    /// Create a file hasher with the given read buffer size
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Read buffer size in bytes
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    fn hash_source(
        &self,
        source: &SourceId,
        algorithm: HashAlgorithm,
    ) -> Result<(Digest, u64), JobFailure> {
        match source {
            SourceId::Stdin => {
                hash_reader(algorithm, io::stdin().lock(), self.buffer_size).map_err(JobFailure::read)
            }
            SourceId::Path(path) => {
                let file = File::open(path).map_err(JobFailure::open)?;
                // The handle moves into the reader and is closed before we return.
                hash_reader(algorithm, file, self.buffer_size).map_err(JobFailure::read)
            }
        }
    }
}

impl Default for FileHasher {
    fn default() -> Self {
        Self::new(DEFAULT_READ_BUFFER)
    }
}

impl JobExecutor for FileHasher {
    fn execute(&self, job: HashJob) -> HashReport {
        let start = Instant::now();

        match self.hash_source(&job.source, job.algorithm) {
            Ok((digest, bytes)) => HashReport::success(job, digest, bytes, start.elapsed()),
            Err(failure) => HashReport::failure(job, failure, start.elapsed()),
        }
    }
}
