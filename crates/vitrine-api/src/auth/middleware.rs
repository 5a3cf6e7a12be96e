use crate::auth::JwtService;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use vitrine_core::AppError;

/// Require `Authorization: Bearer <token>` and attach the caller's
/// [`Principal`](vitrine_core::Principal) to the request.
pub async fn auth_middleware(
    State(jwt): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        ))
        .into_response();
    };

    match jwt.verify(token.trim()) {
        Ok(principal) => {
            tracing::debug!(user_id = principal.user_id, "Request authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => HttpAppError(e).into_response(),
    }
}
