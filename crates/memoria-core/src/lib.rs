//! memoria-core: shared ids, domain model, errors, configuration, and the
//! caption transformer.
//!
//! This crate is the foundational dependency for the other memoria-* crates.
//! It performs no I/O apart from reading the configuration file.

pub mod caption;
pub mod config;
pub mod error;
pub mod ids;
pub mod model;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
pub use model::*;
