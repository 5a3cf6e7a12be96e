use crate::auth::AuthUser;
use crate::error::{ApiPath, ErrorResponse, HttpAppError};
use crate::handlers::responses::MessageResponse;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use vitrine_core::AppError;
use vitrine_services::DeleteOutcome;

#[utoipa::path(
    delete,
    path = "/api/v1/media/{id}",
    tag = "media",
    params(
        ("id" = i64, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Media deleted", body = MessageResponse),
        (status = 400, description = "Invalid media id", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = user.0.user_id, media_id = id, operation = "delete_media"))]
pub async fn delete_media(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    match state.media.ingestion.delete(&user.0, id).await? {
        DeleteOutcome::Deleted { file, .. } => {
            if file.is_failed() {
                tracing::warn!("Record deleted but its file was left on disk");
            }
            Ok(Json(MessageResponse::new("File deleted successfully")))
        }
        DeleteOutcome::Missing => Err(AppError::NotFound("Media not found".to_string()).into()),
    }
}
