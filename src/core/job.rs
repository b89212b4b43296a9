//! Hashing jobs and their reports

use crate::hash::{Digest, HashAlgorithm};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Where a job reads its bytes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceId {
    /// A file path, opened by the worker that runs the job
    Path(PathBuf),
    /// Standard input
    Stdin,
}

impl SourceId {
    /// Identifier that selects standard input in a file list
    pub const STDIN_MARKER: &'static str = "-";

    /// Check if this source is standard input
    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("stdin"),
        }
    }
}

impl From<&str> for SourceId {
    fn from(identifier: &str) -> Self {
        if identifier == Self::STDIN_MARKER {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(identifier))
        }
    }
}

impl From<String> for SourceId {
    fn from(identifier: String) -> Self {
        Self::from(identifier.as_str())
    }
}

impl From<PathBuf> for SourceId {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// One unit of work: hash one source with one algorithm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashJob {
    /// Position of the source in the input list
    pub sequence: usize,
    /// Source to read
    pub source: SourceId,
    /// Registered algorithm to apply
    pub algorithm: HashAlgorithm,
}

impl HashJob {
    /// Create a new job
    pub fn new(sequence: usize, source: impl Into<SourceId>, algorithm: HashAlgorithm) -> Self {
        Self {
            sequence,
            source: source.into(),
            algorithm,
        }
    }
}

/// Stage of a job at which I/O failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The source could not be opened
    Open,
    /// The source could not be read to the end
    Read,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("opening"),
            Self::Read => f.write_str("reading"),
        }
    }
}

/// I/O failure recorded in a single job's report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct JobFailure {
    /// Where the job failed
    pub kind: FailureKind,
    /// Underlying I/O error kind
    pub io_kind: io::ErrorKind,
    /// Underlying I/O error message
    pub message: String,
}

impl JobFailure {
    /// Failure to open the source
    pub fn open(err: io::Error) -> Self {
        Self::from_io(FailureKind::Open, err)
    }

    /// Failure while consuming the source
    pub fn read(err: io::Error) -> Self {
        Self::from_io(FailureKind::Read, err)
    }

    fn from_io(kind: FailureKind, err: io::Error) -> Self {
        Self {
            kind,
            io_kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one job, carrying the job itself for ordering and display
#[derive(Debug, Clone, PartialEq)]
pub struct HashReport {
    /// Job this report answers
    pub job: HashJob,
    /// Digest, or the I/O failure that prevented it
    pub outcome: Result<Digest, JobFailure>,
    /// Bytes consumed from the source
    pub bytes: u64,
    /// Wall time spent on the job
    pub elapsed: Duration,
}

impl HashReport {
    /// Successful report
    pub fn success(job: HashJob, digest: Digest, bytes: u64, elapsed: Duration) -> Self {
        Self {
            job,
            outcome: Ok(digest),
            bytes,
            elapsed,
        }
    }

    /// Failed report
    pub fn failure(job: HashJob, failure: JobFailure, elapsed: Duration) -> Self {
        Self {
            job,
            outcome: Err(failure),
            bytes: 0,
            elapsed,
        }
    }

    /// Sequence index of the originating job
    pub fn sequence(&self) -> usize {
        self.job.sequence
    }

    /// Check if a digest was produced
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Digest, if the job succeeded
    pub fn digest(&self) -> Option<&Digest> {
        self.outcome.as_ref().ok()
    }

    /// Failure, if the job failed
    pub fn failure_info(&self) -> Option<&JobFailure> {
        self.outcome.as_ref().err()
    }
}
