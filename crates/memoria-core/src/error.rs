//! Unified error type for memoria.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in memoria.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested document could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "user", "folder").
        entity: String,
        /// The identifier or document path that was looked up.
        id: String,
    },

    /// A folder reference could not be mapped to an item collection.
    #[error("Invalid folder reference: {0}")]
    InvalidReference(String),

    /// The active folder exists but holds no items.
    #[error("Folder {folder_id} is empty")]
    EmptyFolder {
        /// The folder that was resolved.
        folder_id: String,
    },

    /// An item image lacks the fields needed to build a captioned URL.
    #[error("Invalid transform input: {0}")]
    TransformInputInvalid(String),

    /// The caller could not be verified as the requested user.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A store operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::InvalidReference(_) => 422,
            Error::EmptyFolder { .. } => 204,
            Error::TransformInputInvalid(_) => 422,
            Error::Unauthorized(_) => 401,
            Error::Validation(_) => 400,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::InvalidReference(_) => "invalid_reference",
            Error::EmptyFolder { .. } => "empty_folder",
            Error::TransformInputInvalid(_) => "transform_input_invalid",
            Error::Unauthorized(_) => "unauthorized",
            Error::Validation(_) => "validation_error",
            Error::Database { .. } => "database_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }

    /// Convenience constructor for [`Error::TransformInputInvalid`].
    pub fn transform(message: impl Into<String>) -> Self {
        Error::TransformInputInvalid(message.into())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("user", "u1");
        assert_eq!(err.to_string(), "user not found: u1");
        assert_eq!(err.http_status(), 404);
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn invalid_reference_display() {
        let err = Error::InvalidReference("unknown category 'shared'".into());
        assert_eq!(
            err.to_string(),
            "Invalid folder reference: unknown category 'shared'"
        );
        assert_eq!(err.http_status(), 422);
    }

    #[test]
    fn empty_folder_is_no_content() {
        let err = Error::EmptyFolder {
            folder_id: "f1".into(),
        };
        assert_eq!(err.to_string(), "Folder f1 is empty");
        assert_eq!(err.http_status(), 204);
    }

    #[test]
    fn transform_display() {
        let err = Error::transform("image has no height");
        assert_eq!(err.to_string(), "Invalid transform input: image has no height");
        assert_eq!(err.http_status(), 422);
    }

    #[test]
    fn unauthorized_display() {
        let err = Error::Unauthorized("bad token".into());
        assert_eq!(err.to_string(), "Unauthorized: bad token");
        assert_eq!(err.http_status(), 401);
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("delta or setTo is required".into());
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn database_display() {
        let err = Error::database("connection refused");
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn internal_display() {
        let err = Error::Internal("unexpected state".into());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.http_status(), 500);
    }
}
