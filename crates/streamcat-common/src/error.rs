//! Unified error type for streamcat.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for the HTTP layer to derive a status code via [`Error::http_status`].

use std::fmt;

/// Why the access policy refused playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The content is hidden.
    NotVisible,
    /// The availability window has elapsed.
    AvailabilityElapsed,
    /// The content requires a VIP subscription the caller does not have.
    VipRequired,
    /// The content is age restricted and the caller's age is unknown.
    AgeUnverified,
    /// The caller is younger than the content's minimum age.
    BelowMinimumAge,
}

impl DenialReason {
    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotVisible => "not_visible",
            Self::AvailabilityElapsed => "availability_elapsed",
            Self::VipRequired => "vip_required",
            Self::AgeUnverified => "age_unverified",
            Self::BelowMinimumAge => "below_minimum_age",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotVisible => "not currently available",
            Self::AvailabilityElapsed => "availability window elapsed",
            Self::VipRequired => "VIP subscription required",
            Self::AgeUnverified => "age could not be verified",
            Self::BelowMinimumAge => "below minimum age",
        };
        f.write_str(msg)
    }
}

/// Unified error type covering all failure modes in streamcat.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "content").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The caller did not identify itself.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller's role may not perform the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The access policy denied playback.
    #[error("Access denied: {0}")]
    AccessDenied(DenialReason),

    /// The local byte source behind a content record is missing or unreadable.
    #[error("Source unavailable at {path}: {reason}")]
    SourceUnavailable {
        /// Filesystem path that was checked.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// The requested byte range cannot be served.
    #[error("Range not satisfiable for resource of {length} bytes")]
    RangeNotSatisfiable {
        /// Total length of the resource.
        length: u64,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request conflicts with the current catalog state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A content record is malformed (e.g. unknown media kind).
    #[error("Misconfigured content: {0}")]
    Misconfigured(String),

    /// A database operation failed.
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
            Error::Unauthorized(_) => 401,
            Error::Forbidden(_) => 403,
            Error::AccessDenied(_) => 403,
            Error::SourceUnavailable { .. } => 503,
            Error::RangeNotSatisfiable { .. } => 416,
            Error::Validation(_) => 400,
            Error::Conflict(_) => 409,
            Error::Misconfigured(_) => 500,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::Unauthorized(_) => "unauthorized",
            Error::Forbidden(_) => "forbidden",
            Error::AccessDenied(reason) => reason.code(),
            Error::SourceUnavailable { .. } => "source_unavailable",
            Error::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            Error::Validation(_) => "validation_error",
            Error::Conflict(_) => "conflict",
            Error::Misconfigured(_) => "misconfigured",
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

    /// Convenience constructor for [`Error::SourceUnavailable`].
    pub fn source_unavailable(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Self::Conflict(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("content", "abc");
        assert_eq!(err.to_string(), "content not found: abc");

        let err = Error::AccessDenied(DenialReason::VipRequired);
        assert_eq!(err.to_string(), "Access denied: VIP subscription required");

        let err = Error::conflict("rating is final, already submitted");
        assert_eq!(err.to_string(), "Conflict: rating is final, already submitted");

        let err = Error::RangeNotSatisfiable { length: 26 };
        assert_eq!(
            err.to_string(),
            "Range not satisfiable for resource of 26 bytes"
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(Error::not_found("content", "x").http_status(), 404);
        assert_eq!(Error::Unauthorized("no id".into()).http_status(), 401);
        assert_eq!(Error::Forbidden("author".into()).http_status(), 403);
        assert_eq!(
            Error::AccessDenied(DenialReason::BelowMinimumAge).http_status(),
            403
        );
        assert_eq!(Error::source_unavailable("/x", "gone").http_status(), 503);
        assert_eq!(Error::RangeNotSatisfiable { length: 1 }.http_status(), 416);
        assert_eq!(Error::validation("bad score").http_status(), 400);
        assert_eq!(Error::conflict("again").http_status(), 409);
        assert_eq!(Error::Misconfigured("kind".into()).http_status(), 500);
        assert_eq!(Error::database("locked").http_status(), 500);
    }

    #[test]
    fn test_denial_codes_surface_in_error_code() {
        let err = Error::AccessDenied(DenialReason::AgeUnverified);
        assert_eq!(err.code(), "age_unverified");
        assert_eq!(
            DenialReason::AvailabilityElapsed.to_string(),
            "availability window elapsed"
        );
        assert_eq!(DenialReason::NotVisible.to_string(), "not currently available");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
    }
}
