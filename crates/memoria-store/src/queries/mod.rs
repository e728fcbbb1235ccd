//! Typed operations on top of [`DocumentStore`](crate::DocumentStore).

pub mod cursors;
pub mod items;
pub mod users;
