//! Public gallery: every user's media, read-only and unauthenticated.

use crate::error::{ApiQuery, ErrorResponse, HttpAppError};
use crate::handlers::media_get::ListMediaQuery;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use vitrine_core::models::PageResult;

#[utoipa::path(
    get,
    path = "/api/v1/gallery",
    tag = "gallery",
    params(ListMediaQuery),
    responses(
        (status = 200, description = "Page of public media", body = PageResult),
        (status = 400, description = "Invalid media type filter", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_gallery"))]
pub async fn list_gallery(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListMediaQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = query.to_page_request()?;
    let page = state.media.listing.list_public(request).await?;
    Ok(Json(page))
}
