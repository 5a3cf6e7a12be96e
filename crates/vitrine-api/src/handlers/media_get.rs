use crate::auth::AuthUser;
use crate::error::{ApiPath, ApiQuery, ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::ToSchema;
use vitrine_core::models::{MediaKind, OrderKey, PageRequest, PageResult};
use vitrine_core::{AppError, MediaRecord};

/// Listing query parameters, shared by the owner listing and the public gallery.
///
/// Values are kept as strings so that malformed numbers are coerced to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ListMediaQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Items per page (1-100, default 20)
    pub page_size: Option<String>,
    /// `image` or `video`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// sort_order, created_at_desc, created_at_asc, filename_asc, filename_desc,
    /// size_asc or size_desc. Unrecognized values sort newest first.
    pub order_by: Option<String>,
}

impl ListMediaQuery {
    pub fn to_page_request(&self) -> Result<PageRequest, AppError> {
        let number = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|v| v.trim().parse::<i64>().ok())
                .unwrap_or(0)
        };

        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(MediaKind::from_str(raw)?),
        };

        Ok(PageRequest::new(
            number(&self.page),
            number(&self.page_size),
            kind,
            OrderKey::from_query(self.order_by.as_deref()),
        ))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/media",
    tag = "media",
    params(ListMediaQuery),
    responses(
        (status = 200, description = "Page of the caller's media", body = PageResult),
        (status = 400, description = "Invalid media type filter", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = user.0.user_id, operation = "list_media"))]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiQuery(query): ApiQuery<ListMediaQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = query.to_page_request()?;
    let page = state.media.listing.list_for(&user.0, request).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/media/{id}",
    tag = "media",
    params(
        ("id" = i64, Path, description = "Media ID")
    ),
    responses(
        (status = 200, description = "Media found", body = MediaRecord),
        (status = 400, description = "Invalid media id", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = user.0.user_id, media_id = id, operation = "get_media"))]
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let media = state.media.listing.get(&user.0, id).await?;
    Ok(Json(media))
}
