//! Raw file serving for the gallery. Only paths that belong to a live record are served.

use crate::error::{ApiPath, ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use std::sync::Arc;
use vitrine_core::AppError;

/// Reject anything that is not a plain relative path.
fn validate_relative_path(path: &str) -> Result<&str, AppError> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|segment| segment == ".." || segment == ".");

    if invalid {
        return Err(AppError::InvalidInput("Invalid file path".to_string()));
    }
    Ok(path)
}

#[utoipa::path(
    get,
    path = "/api/v1/files/{path}",
    tag = "gallery",
    params(
        ("path" = String, Path, description = "Relative path of the stored file, e.g. 2024/03/01/<uuid>.jpg")
    ),
    responses(
        (status = 200, description = "File contents with the recorded content type"),
        (status = 400, description = "Invalid path", body = ErrorResponse),
        (status = 404, description = "No such file", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "serve_file"))]
pub async fn serve_file(
    State(state): State<Arc<AppState>>,
    ApiPath(path): ApiPath<String>,
) -> Result<Response, HttpAppError> {
    let relative_path = validate_relative_path(&path)?;

    let record = state
        .media
        .listing
        .resolve_public_file(relative_path)
        .await?;

    let storage = &state.media.storage;
    let content_length = storage.content_length(&record.relative_path).await?;
    let stream = storage.download_stream(&record.relative_path).await?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, record.content_type.as_str())
        .header(header::CONTENT_LENGTH, content_length)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_relative_path() {
        assert!(validate_relative_path("2024/03/01/a.png").is_ok());
        assert!(validate_relative_path("../secret").is_err());
        assert!(validate_relative_path("2024/../../etc/passwd").is_err());
        assert!(validate_relative_path("/etc/passwd").is_err());
        assert!(validate_relative_path("2024\\a.png").is_err());
        assert!(validate_relative_path("").is_err());
    }
}
