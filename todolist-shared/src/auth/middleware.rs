/// Session authentication middleware for Axum
///
/// Resolves the session cookie on every request to a protected route and
/// adds an [`AuthContext`] to the request extensions. Requests without a
/// valid session are rejected with `400 Bad Request` before the handler runs.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use todolist_shared::auth::{jwt::TokenService, middleware::{session_auth_middleware, AuthContext}};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     auth.user_id.to_string()
/// }
///
/// let tokens = TokenService::new("your-secret-key-at-least-32-bytes");
/// let app: Router = Router::new()
///     .route("/whoami", get(whoami))
///     .layer(middleware::from_fn_with_state(tokens, session_auth_middleware));
/// ```

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::TokenService;
use super::session::resolve_session;
use crate::response::ErrorBody;

/// Authentication context added to request extensions
///
/// Handlers extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID (the token subject)
    pub user_id: Uuid,
}

impl AuthContext {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Why a request could not be authenticated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No session cookie was sent
    #[error("User not logged in")]
    MissingSession,

    /// The session token is expired, tampered with or malformed
    #[error("Session Expired.")]
    InvalidSession,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Session authentication middleware
///
/// # Errors
///
/// Returns 400 Bad Request if the session cookie is missing or its token
/// does not verify.
pub async fn session_auth_middleware(
    State(tokens): State<TokenService>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_context = resolve_session(req.headers(), &tokens)?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header, middleware, routing::get, Extension, Router};
    use tower::Service as _;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
        auth.user_id.to_string()
    }

    fn app(tokens: TokenService) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(tokens, session_auth_middleware))
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_auth_error_into_response() {
        let response = AuthError::MissingSession.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::InvalidSession.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_middleware_injects_context() {
        let tokens = TokenService::new(SECRET);
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();

        let request = Request::builder()
            .uri("/whoami")
            .header(header::COOKIE, format!("auth_token={}", token))
            .body(Body::empty())
            .unwrap();

        let response = app(tokens).call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, user_id.to_string());
    }

    #[tokio::test]
    async fn test_middleware_rejects_missing_cookie() {
        let request = Request::builder()
            .uri("/whoami")
            .body(Body::empty())
            .unwrap();

        let response = app(TokenService::new(SECRET)).call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "User not logged in");
    }

    #[tokio::test]
    async fn test_middleware_rejects_foreign_token() {
        let token = TokenService::new("some-other-secret-at-least-32-bytes")
            .issue(Uuid::new_v4())
            .unwrap();

        let request = Request::builder()
            .uri("/whoami")
            .header(header::COOKIE, format!("auth_token={}", token))
            .body(Body::empty())
            .unwrap();

        let response = app(TokenService::new(SECRET)).call(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["message"], "Session Expired.");
    }
}
