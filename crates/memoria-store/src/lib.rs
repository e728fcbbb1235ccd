//! memoria-store: document storage for users, folders and folder items.
//!
//! Documents are JSON bodies addressed by slash-separated paths
//! (`users/u1/folders/f1`). The [`DocumentStore`] trait is the only contract
//! the rest of the system depends on; [`SqliteStore`] implements it on top of
//! an r2d2 SQLite pool with embedded migrations. The `queries` modules hold
//! the typed operations built on that contract.

pub mod migrations;
pub mod paths;
pub mod pool;
pub mod queries;
pub mod sqlite;
pub mod store;

#[cfg(any(test, feature = "test-util"))]
pub mod recording;

pub use sqlite::SqliteStore;
pub use store::{DocumentStore, FieldOp, FieldWrite, StoredDocument};
