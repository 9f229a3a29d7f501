//! Session tokens.
//!
//! Sessions are HS256 JWTs whose subject is the student id. They are handed
//! out by login, both in the response body and as the session cookie.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use questboard_core::StudentId;

use crate::config::ServiceConfig;
use crate::error::ApiError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "questboard_session";

/// Audience claim of every session token.
pub const SESSION_AUDIENCE: &str = "questboard-web";

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (student ID).
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Audience.
    pub aud: String,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}

/// Issue a session token for a student.
pub fn issue_token(config: &ServiceConfig, student_id: &StudentId) -> Result<String, ApiError> {
    let now = Utc::now().timestamp();
    let ttl = i64::try_from(config.session_ttl_seconds).unwrap_or(i64::MAX);

    let claims = SessionClaims {
        sub: student_id.to_string(),
        iss: config.session_issuer.clone(),
        aud: SESSION_AUDIENCE.into(),
        exp: now.saturating_add(ttl),
        iat: now,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign session token: {e}")))
}

/// Validate a session token and return the student it belongs to.
pub fn verify_token(config: &ServiceConfig, token: &str) -> Result<StudentId, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[SESSION_AUDIENCE]);
    validation.set_issuer(&[&config.session_issuer]);

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Session token validation failed");
        ApiError::Unauthorized
    })?;

    token_data
        .claims
        .sub
        .parse::<StudentId>()
        .map_err(|_| ApiError::Unauthorized)
}

/// `Set-Cookie` value carrying a fresh session.
#[must_use]
pub fn session_cookie(config: &ServiceConfig, token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.session_ttl_seconds
    )
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let config = ServiceConfig::default();
        let id = StudentId::generate();

        let token = issue_token(&config, &id).unwrap();

        assert_eq!(verify_token(&config, &token).unwrap(), id);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let config = ServiceConfig::default();
        let other = ServiceConfig {
            session_secret: "another-secret".into(),
            ..ServiceConfig::default()
        };
        let token = issue_token(&other, &StudentId::generate()).unwrap();

        assert!(matches!(
            verify_token(&config, &token),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn token_from_other_issuer_is_rejected() {
        let config = ServiceConfig::default();
        let other = ServiceConfig {
            session_issuer: "elsewhere".into(),
            ..ServiceConfig::default()
        };
        let token = issue_token(&other, &StudentId::generate()).unwrap();

        assert!(verify_token(&config, &token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token(&ServiceConfig::default(), "not-a-token").is_err());
    }

    #[test]
    fn cookies_name_the_session() {
        let config = ServiceConfig::default();
        assert!(session_cookie(&config, "abc").starts_with("questboard_session=abc;"));
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
