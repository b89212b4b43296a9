//! Progress reporting module
//!
//! Live job counts on stderr while the pipeline runs.

mod reporter;

pub use reporter::*;
