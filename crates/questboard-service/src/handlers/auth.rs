//! Registration, login and logout handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use questboard_core::student::{normalize_email, validate_name, validate_password};
use questboard_core::Student;
use questboard_store::Store;

use super::StudentView;
use crate::auth::AuthStudent;
use crate::crypto::{hash_password, verify_password};
use crate::error::ApiError;
use crate::session::{clear_session_cookie, issue_token, session_cookie};
use crate::state::AppState;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Plain-text password.
    pub password: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: Option<String>,
    /// Plain-text password.
    pub password: Option<String>,
}

/// Successful login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session token, also set as the session cookie.
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
    /// The logged-in student.
    pub student: StudentView,
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{field} is required")))
}

/// Register a new student.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = required("name", body.name)?;
    let email = normalize_email(&required("email", body.email)?);
    let password = required("password", body.password)?;

    validate_name(&name).map_err(ApiError::BadRequest)?;
    validate_password(&password).map_err(ApiError::BadRequest)?;
    if !email.contains('@') {
        return Err(ApiError::BadRequest("email is not valid".into()));
    }

    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("password hashing task failed: {e}")))?;
    let student = Student::new(name, email, password_hash);
    state.store.create_student(&student)?;

    tracing::info!(student_id = %student.id, "Student registered");

    Ok((StatusCode::CREATED, Json(StudentView::from(&student))))
}

/// Log in with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = normalize_email(&required("email", body.email)?);
    let password = required("password", body.password)?;

    let candidate = state.store.find_student_by_email(&email)?;
    let student = tokio::task::spawn_blocking(move || {
        candidate.filter(|s| verify_password(&password, &s.password_hash))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("password check task failed: {e}")))?
    .ok_or_else(|| {
        tracing::debug!("Login rejected");
        ApiError::InvalidCredentials
    })?;

    let token = issue_token(&state.config, &student.id)?;
    let cookie = session_cookie(&state.config, &token);

    tracing::info!(student_id = %student.id, "Student logged in");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(SessionResponse {
            token,
            expires_in: state.config.session_ttl_seconds,
            student: StudentView::from(&student),
        }),
    ))
}

/// Log out, clearing the session cookie.
pub async fn logout(auth: AuthStudent) -> impl IntoResponse {
    tracing::info!(student_id = %auth.student_id, "Student logged out");

    (
        [(SET_COOKIE, clear_session_cookie())],
        Json(serde_json::json!({ "logged_out": true })),
    )
}
