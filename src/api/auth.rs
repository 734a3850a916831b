//! Auth endpoints: register, login, token refresh, current user.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::auth::jwt::{self, TokenType};
use crate::auth::{password, AuthUser};
use crate::db::users::{self, User};
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, UserResponse};
use crate::validators;
use crate::AppState;

fn auth_response(state: &AppState, user: &User) -> ApiResult<AuthResponse> {
    let pair = jwt::issue_pair(
        user.id,
        &user.username,
        &state.config.jwt_secret,
        state.config.access_token_minutes,
        state.config.refresh_token_days,
    )
    .map_err(|e| ApiError::Internal(format!("Failed to issue tokens: {}", e)))?;

    Ok(AuthResponse {
        user: UserResponse::from(user),
        access: pair.access,
        refresh: pair.refresh,
    })
}

/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid username, email, or password"),
        (status = 409, description = "Username or email already registered"),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    validators::validate_username(&req.username)?;
    validators::validate_email(&req.email)?;
    validators::validate_password(&req.password)?;

    if users::username_or_email_taken(&state.db, &req.username, &req.email).await? {
        return Err(ApiError::Conflict(
            "A user with that username or email already exists".to_string(),
        ));
    }

    let password_hash = password::hash(&req.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;
    let user = User::new(req.username, req.email, password_hash);
    users::insert_user(&state.db, &user).await?;

    info!(username = %user.username, "Registered new user");

    let response = auth_response(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
///
/// Unknown user, wrong password, and deactivated account are
/// indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let user = users::find_by_username(&state.db, &req.username)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    if !user.is_active || !password::verify(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    info!(username = %user.username, "User logged in");
    Ok(Json(auth_response(&state, &user)?))
}

/// POST /api/auth/refresh
///
/// Rotation: a valid refresh token yields a fresh access + refresh pair.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, description = "Invalid or expired refresh token"),
    ),
    tag = "auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let claims = jwt::verify_typed(&req.refresh, &state.config.jwt_secret, TokenType::Refresh)
        .map_err(|_| ApiError::Unauthorized)?;
    let user_id = claims.user_id().map_err(|_| ApiError::Unauthorized)?;

    let user = users::find_by_id(&state.db, user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(auth_response(&state, &user)?))
}

/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Not authenticated"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> ApiResult<Json<UserResponse>> {
    let user_id = claims.user_id().map_err(|_| ApiError::Unauthorized)?;
    let user = users::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(UserResponse::from(&user)))
}

/// Build auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/me", get(me))
}
