//! Route handlers for the HTTP API.

pub mod active;
pub mod health;
