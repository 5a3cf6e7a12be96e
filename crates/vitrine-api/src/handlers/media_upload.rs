use crate::auth::AuthUser;
use crate::error::{ApiMultipart, ErrorResponse, HttpAppError};
use crate::handlers::responses::MediaEnvelope;
use crate::state::AppState;
use crate::utils::upload::{multipart_error, parse_declared_size, upload_from_field};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Instant;
use vitrine_core::AppError;

#[utoipa::path(
    post,
    path = "/api/v1/media/upload",
    tag = "media",
    request_body(
        content_type = "multipart/form-data",
        description = "Optional `size` text field (declared byte count) followed by the `file` field"
    ),
    responses(
        (status = 201, description = "Media uploaded", body = MediaEnvelope),
        (status = 400, description = "Missing or empty file, or not an image or video", body = ErrorResponse),
        (status = 413, description = "File exceeds the upload ceiling", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = user.0.user_id, operation = "upload_media"))]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let started = Instant::now();
    let mut declared_size = None;
    let mut uploaded = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("size") => {
                let raw = field.text().await.map_err(multipart_error)?;
                declared_size = parse_declared_size(&raw)?;
            }
            Some("file") => {
                let upload = upload_from_field(field, declared_size);
                uploaded = Some(state.media.ingestion.ingest(&user.0, upload).await?);
                break;
            }
            _ => {}
        }
    }

    let media =
        uploaded.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    tracing::info!(
        media_id = media.id,
        size_bytes = media.size_bytes,
        duration_ms = started.elapsed().as_millis() as u64,
        "Upload completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(MediaEnvelope {
            media,
            message: "File uploaded successfully".to_string(),
        }),
    ))
}
