//! Settings handlers: rename and avatar upload.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use questboard_core::profile::{avatar_file_name, is_allowed_avatar, ALLOWED_AVATAR_EXTENSIONS};
use questboard_core::student::validate_name;
use questboard_core::{set_uploaded_avatar, Ledger};
use questboard_store::Store;

use super::{run_unit_of_work, MutationResponse, StudentView};
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the avatar image.
const AVATAR_FIELD: &str = "avatar";

/// Settings view.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    /// The student.
    pub student: StudentView,
    /// Extensions accepted for avatar uploads.
    pub avatar_extensions: Vec<&'static str>,
}

/// Rename request.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    /// The new display name.
    pub name: Option<String>,
}

/// Current settings.
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<SettingsResponse>, ApiError> {
    let student = state
        .store
        .get_student(&auth.student_id)?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(SettingsResponse {
        student: StudentView::from(&student),
        avatar_extensions: ALLOWED_AVATAR_EXTENSIONS.to_vec(),
    }))
}

/// Change the display name.
pub async fn rename(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
    Json(body): Json<RenameRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let name = body
        .name
        .ok_or_else(|| ApiError::BadRequest("name is required".into()))?;
    validate_name(&name).map_err(ApiError::BadRequest)?;

    if let Some(holder) = state.store.find_student_by_name(&name)? {
        if holder.id != auth.student_id {
            return Err(ApiError::Conflict(format!("name already in use: {name}")));
        }
    }

    let ((), committed) = run_unit_of_work(&state, &auth.student_id, |uow| {
        let student = uow.student_mut();
        if student.name == name {
            return Err(ApiError::BadRequest(
                "new name must differ from the current one".into(),
            ));
        }
        student.name.clone_from(&name);
        student.updated_at = chrono::Utc::now();
        Ok(())
    })?;

    tracing::info!(student_id = %auth.student_id, "Student renamed");

    Ok(Json(MutationResponse::new("Name updated", &committed)))
}

/// Upload a new avatar image.
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
    mut multipart: Multipart,
) -> Result<Json<MutationResponse>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(AVATAR_FIELD) {
            continue;
        }
        let original = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        upload = Some((original, bytes));
        break;
    }

    let (original, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("no avatar file was sent".into()))?;
    if original.is_empty() || bytes.is_empty() {
        return Err(ApiError::BadRequest("no avatar file was sent".into()));
    }
    if !is_allowed_avatar(&original) {
        return Err(ApiError::BadRequest(format!(
            "file type not allowed, use one of: {}",
            ALLOWED_AVATAR_EXTENSIONS.join(", ")
        )));
    }

    let file_name = avatar_file_name(&auth.student_id, &original);
    let upload_dir = state.upload_dir();
    let path = upload_dir.join(&file_name);

    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to create upload dir: {e}")))?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to store avatar: {e}")))?;

    let result = run_unit_of_work(&state, &auth.student_id, |uow| {
        set_uploaded_avatar(uow, file_name.clone()).map_err(ApiError::from)
    });

    let ((), committed) = match result {
        Ok(done) => done,
        Err(e) => {
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                tracing::warn!(error = %remove_err, path = %path.display(), "Failed to remove orphaned avatar");
            }
            return Err(e);
        }
    };

    tracing::info!(
        student_id = %auth.student_id,
        file_name = %file_name,
        size = bytes.len(),
        "Avatar stored"
    );

    Ok(Json(MutationResponse::new("Avatar updated", &committed)))
}
