/// Authentication endpoints
///
/// - `POST /auth/signup` - Register a new user
/// - `POST /auth/login` - Verify credentials and set the session cookie
/// - `POST /auth/logout` - Clear the session cookie
///
/// Passwords are hashed with Argon2id on the blocking pool so request
/// workers are never stalled by the KDF.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{validate_body, ApiJson},
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Json,
};
use serde::Deserialize;
use todolist_shared::{
    auth::{
        password,
        session::{clear_session_cookie, session_cookie},
    },
    models::user::CreateUser,
    response::ApiResponse,
};
use validator::Validate;

/// Generic login failure, shared by unknown user and wrong password
const INVALID_LOGIN: &str = "Invalid Login Details";

/// Credentials body for signup and login
#[derive(Debug, Deserialize, Validate)]
pub struct AuthRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

const FIELD_ORDER: &[&str] = &["username", "password"];

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/signup
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw1" }
/// ```
///
/// # Response
///
/// ```json
/// { "success": true }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Username or password missing
/// - `409 Conflict`: Username already taken
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AuthRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    validate_body(&req, FIELD_ORDER)?;

    let plaintext = req.password;
    let password_hash =
        tokio::task::spawn_blocking(move || password::hash_password(&plaintext)).await??;

    let user = state
        .store
        .create_user(CreateUser {
            username: req.username,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(ApiResponse::ok()))
}

/// Log in and receive a session cookie
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw1" }
/// ```
///
/// On success the response carries
/// `Set-Cookie: auth_token=<token>; Max-Age=3600; Path=/; HttpOnly; SameSite=None`.
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields, unknown user or wrong password. The
///   last two share one message.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AuthRequest>,
) -> ApiResult<(HeaderMap, Json<ApiResponse<()>>)> {
    validate_body(&req, FIELD_ORDER)?;

    let user = state
        .store
        .find_user_by_username(&req.username)
        .await?
        .ok_or_else(|| ApiError::BadRequest(INVALID_LOGIN.to_string()))?;

    let plaintext = req.password;
    let stored_hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || {
        password::verify_password(&plaintext, &stored_hash)
    })
    .await??;

    if !matches {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::BadRequest(INVALID_LOGIN.to_string()));
    }

    let token = state.tokens.issue(user.id)?;
    let cookie = session_cookie(
        &token,
        state.tokens.ttl().num_seconds(),
        state.secure_cookies(),
    );

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((set_cookie(&cookie)?, Json(ApiResponse::ok())))
}

/// Log out by expiring the session cookie
///
/// Always succeeds; the token itself stays valid until it expires.
pub async fn logout(State(state): State<AppState>) -> ApiResult<(HeaderMap, Json<ApiResponse<()>>)> {
    let cookie = clear_session_cookie(state.secure_cookies());
    Ok((set_cookie(&cookie)?, Json(ApiResponse::ok())))
}

fn set_cookie(cookie: &str) -> ApiResult<HeaderMap> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie header: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, value);
    Ok(headers)
}
