use crate::auth::AuthUser;
use crate::error::{ApiPath, ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;
use vitrine_core::MediaRecord;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMediaRequest {
    /// New rank, any integer including negatives; omit to leave the record unchanged
    pub sort_order: Option<i32>,
}

#[utoipa::path(
    put,
    path = "/api/v1/media/{id}",
    tag = "media",
    params(
        ("id" = i64, Path, description = "Media ID")
    ),
    request_body = UpdateMediaRequest,
    responses(
        (status = 200, description = "Media updated", body = MediaRecord),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = user.0.user_id, media_id = id, operation = "update_media"))]
pub async fn update_media(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateMediaRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let media = state
        .media
        .reconciler
        .set_rank(&user.0, id, request.sort_order)
        .await?;
    Ok(Json(media))
}
