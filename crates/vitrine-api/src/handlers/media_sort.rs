use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::responses::MessageResponse;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SortMediaRequest {
    /// Media ids in their new display order; the first gets rank 1
    pub media_ids: Vec<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/media/sort",
    tag = "media",
    request_body = SortMediaRequest,
    responses(
        (status = 200, description = "Order updated", body = MessageResponse),
        (status = 400, description = "Empty or malformed id list", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = user.0.user_id, count = request.media_ids.len(), operation = "sort_media"))]
pub async fn sort_media(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(request): ValidatedJson<SortMediaRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    state
        .media
        .reconciler
        .reorder(&user.0, &request.media_ids)
        .await?;
    Ok(Json(MessageResponse::new("Order updated successfully")))
}
