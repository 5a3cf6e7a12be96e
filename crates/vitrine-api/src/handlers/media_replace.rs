use crate::auth::AuthUser;
use crate::error::{ApiMultipart, ApiPath, ErrorResponse, HttpAppError};
use crate::handlers::responses::MediaEnvelope;
use crate::state::AppState;
use crate::utils::upload::{multipart_error, parse_declared_size, upload_from_field};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Instant;
use vitrine_core::AppError;

#[utoipa::path(
    put,
    path = "/api/v1/media/{id}/replace",
    tag = "media",
    params(
        ("id" = i64, Path, description = "Media ID")
    ),
    request_body(
        content_type = "multipart/form-data",
        description = "Optional `size` text field followed by the replacement `file` field"
    ),
    responses(
        (status = 200, description = "File replaced; id, owner and rank unchanged", body = MediaEnvelope),
        (status = 400, description = "Missing or empty file, or not an image or video", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload ceiling", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = user.0.user_id, media_id = id, operation = "replace_media"))]
pub async fn replace_media(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let started = Instant::now();
    let mut declared_size = None;
    let mut replaced = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("size") => {
                let raw = field.text().await.map_err(multipart_error)?;
                declared_size = parse_declared_size(&raw)?;
            }
            Some("file") => {
                let upload = upload_from_field(field, declared_size);
                replaced = Some(state.media.ingestion.replace(&user.0, id, upload).await?);
                break;
            }
            _ => {}
        }
    }

    let outcome =
        replaced.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    if outcome.previous_file.is_failed() {
        tracing::warn!(media_id = id, "Previous file could not be removed after replace");
    }
    tracing::info!(
        size_bytes = outcome.record.size_bytes,
        duration_ms = started.elapsed().as_millis() as u64,
        "Replace completed"
    );

    Ok(Json(MediaEnvelope {
        media: outcome.record,
        message: "File replaced successfully".to_string(),
    }))
}
