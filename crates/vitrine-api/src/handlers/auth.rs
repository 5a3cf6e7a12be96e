use crate::auth::models::{LoginRequest, LoginResponse, UserResponse};
use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use vitrine_core::password::verify_login;
use vitrine_core::AppError;

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(username = %request.username, operation = "login"))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state.users.find_by_username(&request.username).await?;

    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let password = request.password;
    let verified =
        tokio::task::spawn_blocking(move || verify_login(&password, stored_hash.as_deref()))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            tracing::debug!("Unknown user or password mismatch");
            return Err(invalid_credentials().into());
        }
    };

    let token = state.jwt.issue(&user)?;
    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let account = state
        .users
        .find_by_id(user.0.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(account)))
}
