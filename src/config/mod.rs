//! Configuration module for hashpipe
//!
//! Command-line arguments and the runtime settings derived from them.

mod settings;

pub use settings::*;
