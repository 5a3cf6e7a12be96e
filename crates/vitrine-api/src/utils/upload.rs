//! Common utilities for multipart upload handlers

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use vitrine_core::AppError;
use vitrine_services::IncomingUpload;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Map a multipart framing failure to the matching client error.
pub fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body is too large".to_string())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Parse the optional `size` form field. An empty value means "not declared".
pub fn parse_declared_size(raw: &str) -> Result<Option<u64>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>().map(Some).map_err(|_| {
        AppError::InvalidInput("size must be a non-negative integer".to_string())
    })
}

/// Wrap the `file` field as a streaming upload without buffering it in memory.
pub fn upload_from_field<'a>(field: Field<'a>, declared_size: Option<u64>) -> IncomingUpload<'a> {
    let declared_filename = field.file_name().unwrap_or_default().to_string();
    let declared_content_type = field
        .content_type()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();
    let body = StreamReader::new(Box::pin(field.map_err(std::io::Error::other)));

    IncomingUpload {
        body: Box::new(body),
        declared_filename,
        declared_content_type,
        declared_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declared_size() {
        assert_eq!(parse_declared_size("").unwrap(), None);
        assert_eq!(parse_declared_size(" 1024 ").unwrap(), Some(1024));
        assert!(parse_declared_size("-5").is_err());
        assert!(parse_declared_size("ten").is_err());
    }
}
