//! Authentication API handlers
//!
//! Thin HTTP shims over [`AuthGateway`]: deserialize, delegate, map the
//! coarse error taxonomy onto status codes. No credential detail beyond the
//! taxonomy ever reaches the wire.

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use crate::auth::gateway::{AuthError, AuthGateway};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub gateway: AuthGateway,
    /// Advertised access-token lifetime, mirrors the signing config
    pub access_ttl_secs: i64,
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, (StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let pair = state
        .gateway
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            let status = match e {
                AuthError::BadCredentials => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ApiResponse::error(e.to_string())))
        })?;

    let response = LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: state.access_ttl_secs,
    };

    Ok(Json(ApiResponse::success(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token issued", body = ApiResponse<RefreshResponse>),
        (status = 400, description = "Refresh token missing"),
        (status = 401, description = "Refresh token invalid or expired")
    )
)]
pub async fn refresh(
    State(state): State<AuthHandlerState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, (StatusCode, Json<ApiResponse<RefreshResponse>>)> {
    let access_token = state
        .gateway
        .refresh(&request.refresh_token)
        .await
        .map_err(|e| {
            let status = match e {
                AuthError::MissingToken => StatusCode::BAD_REQUEST,
                // Internal failures are downgraded, never detailed
                _ => StatusCode::UNAUTHORIZED,
            };
            (status, Json(ApiResponse::error(e.to_string())))
        })?;

    Ok(Json(ApiResponse::success(RefreshResponse { access_token })))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Refresh token revoked", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Refresh token missing")
    )
)]
pub async fn logout(
    State(state): State<AuthHandlerState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .gateway
        .logout(&request.refresh_token)
        .await
        .map_err(|e| {
            let status = match e {
                AuthError::MissingToken => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ApiResponse::error(e.to_string())))
        })?;

    Ok(Json(ApiResponse::success(())))
}
