//! Digest providers and the algorithm registry
//!
//! Hashing itself is delegated to the algorithm crates; this module only
//! names them, builds independent instances on demand and streams bytes
//! into them.

mod hasher;
pub mod registry;

pub use hasher::*;
pub use registry::{algorithm_names, is_supported, lookup, HashAlgorithm, HasherFactory};
