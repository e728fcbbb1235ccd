//! HTTP middleware: request ID and identity verification.

pub mod identity;
pub mod request_id;
