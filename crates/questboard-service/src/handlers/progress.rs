//! Progress reset handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use questboard_core::reset_progress;

use super::{run_unit_of_work, MutationResponse};
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// Wipe the student's progress and start over.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<MutationResponse>, ApiError> {
    let ((), committed) = run_unit_of_work(&state, &auth.student_id, |uow| {
        reset_progress(uow);
        Ok(())
    })?;

    Ok(Json(MutationResponse::new("Progress reset", &committed)))
}
