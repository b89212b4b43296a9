//! # hashpipe - Concurrent File Hashing
//!
//! hashpipe computes digests for a list of files on a pool of worker
//! threads. Results come back either as workers finish them or in the order
//! the files were given, and a file that fails to open or read is reported
//! alongside the others instead of aborting the run.
//!
//! ## Features
//!
//! - **Worker Pool**: a fixed number of threads pulling from one job queue
//! - **Fan-in Merge**: per-worker result streams combined into one
//! - **Input-Order Output**: optional full-barrier reordering by position
//! - **Algorithm Registry**: SHA-1/2/3, MD5, BLAKE3, XXHash, CRC-32,
//!   CRC-64/ISO, Adler-32, and FNV-1/FNV-1a at 32, 64 and 128 bits
//!
//! ## Quick Start
//!
//! ```no_run
//! use hashpipe::config::{OutputOrder, PipelineConfig};
//! use hashpipe::core::{HashPipeline, HashReport};
//!
//! let config = PipelineConfig {
//!     sources: vec!["a.txt".into(), "b.txt".into()],
//!     algorithm: "crc32".into(),
//!     order: OutputOrder::Original,
//!     workers: 2,
//!     ..Default::default()
//! };
//!
//! let mut reports: Vec<HashReport> = Vec::new();
//! let summary = HashPipeline::new(config).run(&mut reports).unwrap();
//!
//! for report in &reports {
//!     println!("{}", hashpipe::core::format_report(report, false));
//! }
//! println!("{} ok, {} failed", summary.succeeded, summary.failed);
//! ```
//!
//! ## Hashing a Single Stream
//!
//! ```no_run
//! use hashpipe::core::hash_single_stream;
//!
//! let digest = hash_single_stream("sha256", std::io::stdin().lock(), 64 * 1024).unwrap();
//! println!("{}", digest);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod hash;
pub mod progress;

// Re-export commonly used types
pub use crate::config::{OutputFormat, OutputOrder, PipelineConfig};
pub use crate::core::{HashPipeline, HashReport, PipelineSummary};
pub use crate::error::{HashPipeError, Result};
pub use crate::progress::ProgressReporter;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use hashpipe::prelude::*;
    //! ```

    pub use crate::config::{OutputFormat, OutputOrder, PipelineConfig};
    pub use crate::core::{
        format_report, hash_single_stream, HashJob, HashPipeline, HashReport, JobExecutor,
        PipelineSummary, ReportSink, ReportWriter,
    };
    pub use crate::error::{HashPipeError, Result};
    pub use crate::hash::{algorithm_names, hash_file, Digest, HashAlgorithm};
    pub use crate::progress::ProgressReporter;
}
