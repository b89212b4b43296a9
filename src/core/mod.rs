//! Concurrent hashing pipeline
//!
//! A job source feeds a shared queue, a fixed pool of workers hashes one
//! job at a time into per-worker result streams, a merger fans those
//! streams into one, and the orderer either passes reports through as they
//! arrive or restores input order before they reach the sink.

mod executor;
mod format;
mod job;
mod merge;
mod order;
mod pipeline;
mod pool;
mod source;
mod stats;

pub use executor::*;
pub use format::*;
pub use job::*;
pub use merge::*;
pub use order::*;
pub use pipeline::*;
pub use pool::*;
pub use source::*;
pub use stats::*;
