//! Authentication extractor.
//!
//! [`AuthStudent`] is the authenticated context every session-gated handler
//! receives. It accepts a Bearer token or the session cookie.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;

use questboard_core::StudentId;
use questboard_store::Store;

use crate::error::ApiError;
use crate::session::{verify_token, SESSION_COOKIE};
use crate::state::AppState;

/// A student authenticated by a session token.
#[derive(Debug, Clone, Copy)]
pub struct AuthStudent {
    /// The student ID.
    pub student_id: StudentId,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(ApiError::Unauthorized)?;

        let student_id = verify_token(&state.config, &token)?;

        // Tokens outlive deleted students.
        if state.store.get_student(&student_id)?.is_none() {
            tracing::debug!(student_id = %student_id, "Session for unknown student");
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthStudent { student_id })
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn reads_bearer_header() {
        let parts = parts(&[("authorization", "Bearer abc.def")]);
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc.def"));
    }

    #[test]
    fn ignores_other_schemes() {
        let parts = parts(&[("authorization", "Basic Zm9v")]);
        assert!(bearer_token(&parts).is_none());
    }

    #[test]
    fn reads_session_cookie_among_others() {
        let parts = parts(&[("cookie", "theme=dark; questboard_session=tok; lang=es")]);
        assert_eq!(cookie_token(&parts).as_deref(), Some("tok"));
    }

    #[test]
    fn empty_session_cookie_is_absent() {
        let parts = parts(&[("cookie", "questboard_session=")]);
        assert!(cookie_token(&parts).is_none());
    }
}
