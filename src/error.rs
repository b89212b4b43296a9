//! Error types for hashpipe
//!
//! Pipeline-level errors live here. Failures that belong to a single job
//! (a file that cannot be opened or read) are not errors at this level:
//! they are recorded in that job's report, see [`crate::core::JobFailure`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for hashpipe operations
#[derive(Error, Debug)]
pub enum HashPipeError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hash algorithm not in the registry
    #[error("hash not found: {0}")]
    UnsupportedAlgorithm(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Standard input could not be fully consumed in single-stream mode
    #[error("getting hash: {0}")]
    Stdin(#[source] std::io::Error),

    /// Writing a report to the output failed
    #[error("Failed to write report: {0}")]
    Output(#[source] std::io::Error),

    /// Thread spawn or join failure
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    /// A report arrived with a sequence index that does not fit the job set
    #[error("Ordering error: {0}")]
    OrderingError(String),
}

impl HashPipeError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error was raised before any job started
    pub fn is_setup_error(&self) -> bool {
        matches!(self, Self::UnsupportedAlgorithm(_) | Self::ConfigError(_))
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for hashpipe operations
pub type Result<T> = std::result::Result<T, HashPipeError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| HashPipeError::io(path, e))
    }
}
