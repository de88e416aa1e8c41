/// Session cookie handling
///
/// The session token travels in a single cookie named [`SESSION_COOKIE`].
/// Resolution has two failure modes that are reported with different
/// messages but lead to the same denial:
///
/// ```text
/// no cookie / empty value  -> AuthError::MissingSession  ("User not logged in")
/// verify() fails           -> AuthError::InvalidSession  ("Session Expired.")
/// verify() succeeds        -> AuthContext { user_id: claims.sub }
/// ```
///
/// The subject is trusted for the rest of the request; the user record is
/// not looked up again.

use axum::http::{header, HeaderMap};
use tracing::debug;

use super::jwt::{JwtError, TokenService};
use super::middleware::{AuthContext, AuthError};

/// Name of the cookie holding the session token
pub const SESSION_COOKIE: &str = "auth_token";

/// Extracts the session token from the request's `Cookie` headers
///
/// Returns `None` when the cookie is missing or has an empty value.
pub fn extract_session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Resolves the authenticated user from the request headers
pub fn resolve_session(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthContext, AuthError> {
    let token = extract_session_token(headers).ok_or(AuthError::MissingSession)?;

    let claims = tokens.verify(token).map_err(|e| {
        match &e {
            JwtError::Expired => debug!("Session token expired"),
            _ => debug!(error = %e, "Session token rejected"),
        }
        AuthError::InvalidSession
    })?;

    Ok(AuthContext::new(claims.sub))
}

/// Builds the `Set-Cookie` value that stores a session token
///
/// `max_age_secs` should equal the token lifetime so the browser drops the
/// cookie when the token stops verifying.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=None",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Builds the `Set-Cookie` value that clears the session cookie immediately
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
