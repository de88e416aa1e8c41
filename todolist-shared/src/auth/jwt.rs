/// Session token issuance and verification
///
/// Session tokens are stateless JWTs signed with HS256 using a process-wide
/// secret. A token carries the user ID as its subject and expires exactly
/// one hour after issuance. There is no server-side session table, so a
/// token cannot be revoked before it expires; logout only clears the cookie
/// that holds it.
///
/// # Validation
///
/// - **Signature**: HMAC-SHA256 over header and payload
/// - **Issuer**: must be `todolist`
/// - **Expiry**: checked with zero leeway
///
/// # Example
///
/// ```
/// use todolist_shared::auth::jwt::TokenService;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("your-secret-key-at-least-32-bytes");
/// let user_id = Uuid::new_v4();
///
/// let token = tokens.issue(user_id)?;
/// let claims = tokens.verify(&token)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Issuer claim stamped on every session token
pub const ISSUER: &str = "todolist";

/// Lifetime of a session token in seconds
pub const SESSION_TTL_SECS: i64 = 60 * 60;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch, wrong issuer or malformed token
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "todolist"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims for a session that expires after [`SESSION_TTL_SECS`]
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::seconds(SESSION_TTL_SECS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// A negative duration yields claims that are already expired.
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Gets time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Signs claims into a JWT using HS256
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, key: &EncodingKey) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);

    encode(&header, claims, key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies the signature, the issuer, `nbf` and `exp`. Malformed input is
/// reported as `JwtError::Invalid`, never as a panic.
pub fn validate_token(token: &str, key: &DecodingKey) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "sub", "iss"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

/// Issues and verifies session tokens with a fixed secret
///
/// Built once at startup from configuration and shared by reference
/// (clones are cheap).
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Creates a token service with the default one-hour lifetime
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(SESSION_TTL_SECS),
        }
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token whose subject is `user_id`
    pub fn issue(&self, user_id: Uuid) -> Result<String, JwtError> {
        let claims = Claims::with_expiration(user_id, self.ttl);
        self.sign(&claims)
    }

    /// Signs arbitrary claims with this service's secret
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        create_token(claims, &self.encoding)
    }

    /// Verifies a token and returns its claims
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        validate_token(token, &self.decoding)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECS);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = TokenService::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = tokens.issue(user_id).expect("Should create token");
        let claims = tokens.verify(&token).expect("Should validate token");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 3600);

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500);
        assert!(time_left.num_seconds() <= 3600);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = TokenService::new(SECRET).issue(Uuid::new_v4()).unwrap();

        let result = TokenService::new("another-secret-key-at-least-32-bytes").verify(&token);
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_verify_expired_token() {
        let tokens = TokenService::new(SECRET);

        // Expired 1 second ago; no leeway is granted
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::seconds(-1));
        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = tokens.sign(&claims).unwrap();
        assert!(matches!(tokens.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_verify_tampered_payload() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue(Uuid::new_v4()).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        // Flip one character of the payload segment
        let mut payload: Vec<char> = parts[1].chars().collect();
        let i = payload.len() / 2;
        payload[i] = if payload[i] == 'A' { 'B' } else { 'A' };
        let payload: String = payload.into_iter().collect();

        let tampered = format!("{}.{}.{}", parts[0], payload, parts[2]);
        assert!(tokens.verify(&tampered).is_err());
    }

    #[test]
    fn test_verify_tampered_signature() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue(Uuid::new_v4()).unwrap();

        let (body, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", body, flipped, &signature[1..]);

        assert!(tokens.verify(&tampered).is_err());
    }

    #[test]
    fn test_verify_garbage_is_invalid() {
        let tokens = TokenService::new(SECRET);

        for garbage in ["", "not-a-token", "a.b.c", "...."] {
            assert!(
                matches!(tokens.verify(garbage), Err(JwtError::Invalid(_))),
                "{garbage:?} should be invalid"
            );
        }
    }

    #[test]
    fn test_verify_rejects_foreign_issuer() {
        let tokens = TokenService::new(SECRET);
        let mut claims = Claims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();

        let token = tokens.sign(&claims).unwrap();
        assert!(matches!(tokens.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", TokenService::new(SECRET));
        assert!(!rendered.contains(SECRET));
    }
}
