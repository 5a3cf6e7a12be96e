//! Error types module
//!
//! Every failure in the media library is expressed as an [`AppError`]. The HTTP layer
//! renders it through [`ErrorMetadata`], so the status code, the machine-readable code and
//! the client-facing message live next to the variant instead of in each handler.
//!
//! The `Database` variant carries a `sqlx::Error` when the `sqlx` feature is enabled.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as validation failures
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the client
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// How one variant is reported.
struct Presentation {
    status: u16,
    code: &'static str,
    kind: &'static str,
    sensitive: bool,
    level: LogLevel,
}

const fn shown(status: u16, code: &'static str, kind: &'static str) -> Presentation {
    Presentation {
        status,
        code,
        kind,
        sensitive: false,
        level: LogLevel::Debug,
    }
}

const fn hidden(code: &'static str, kind: &'static str) -> Presentation {
    Presentation {
        status: 500,
        code,
        kind,
        sensitive: true,
        level: LogLevel::Error,
    }
}

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::Database(_) => hidden("DATABASE_ERROR", "Database"),
            AppError::Storage(_) => hidden("STORAGE_ERROR", "Storage"),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                hidden("INTERNAL_ERROR", "Internal")
            }
            AppError::InvalidInput(_) => shown(400, "INVALID_INPUT", "InvalidInput"),
            AppError::Unauthorized(_) => shown(401, "UNAUTHORIZED", "Unauthorized"),
            AppError::NotFound(_) => shown(404, "NOT_FOUND", "NotFound"),
            AppError::Conflict(_) => shown(409, "CONFLICT", "Conflict"),
            AppError::PayloadTooLarge(_) => shown(413, "PAYLOAD_TOO_LARGE", "PayloadTooLarge"),
            AppError::UnsupportedMediaType(_) => {
                shown(400, "UNSUPPORTED_MEDIA_TYPE", "UnsupportedMediaType")
            }
        }
    }

    /// Variant name, used as a structured log field.
    pub fn error_type(&self) -> &'static str {
        self.presentation().kind
    }

    /// Display text followed by up to five levels of `source()`.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();
        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            if depth == 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
            depth += 1;
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
            AppError::InvalidInput(msg)
            | AppError::NotFound(msg)
            | AppError::UnsupportedMediaType(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(err.client_message(), "Failed to access database");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Media not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.client_message(), "Media not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_upload_rejections_map_to_distinct_statuses() {
        let unsupported = AppError::UnsupportedMediaType("application/pdf".to_string());
        assert_eq!(unsupported.http_status_code(), 400);
        assert_eq!(unsupported.error_code(), "UNSUPPORTED_MEDIA_TYPE");

        let too_large = AppError::PayloadTooLarge("limit is 100 MiB".to_string());
        assert_eq!(too_large.http_status_code(), 413);
        assert!(!too_large.is_sensitive());
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err = AppError::Storage("disk full at /var/lib/vitrine".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Failed to access storage");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("outer context"));
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("outer context"));
    }
}
