//! Dashboard handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use questboard_core::XpProgress;
use questboard_store::Store;

use super::missions::MissionView;
use super::StudentView;
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// Number of in-progress missions shown on the dashboard.
const QUICK_MISSIONS: usize = 3;

/// Dashboard response.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// The student.
    pub student: StudentView,
    /// Experience progress inside the current level.
    pub xp_progress: XpProgress,
    /// A few missions the student has started but not finished.
    pub quick_missions: Vec<MissionView>,
    /// Number of started, unfinished missions.
    pub active_missions: usize,
}

/// Student summary for the landing page.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<DashboardResponse>, ApiError> {
    let student = state
        .store
        .get_student(&auth.student_id)?
        .ok_or(ApiError::Unauthorized)?;

    let active: Vec<_> = state
        .store
        .list_mission_progress(&auth.student_id)?
        .into_iter()
        .filter(|p| !p.completed)
        .collect();

    let mut quick_missions = Vec::with_capacity(QUICK_MISSIONS);
    for progress in active.iter().take(QUICK_MISSIONS) {
        if let Some(mission) = state.store.get_mission(progress.mission_id)? {
            quick_missions.push(MissionView::new(mission, Some(progress)));
        }
    }

    Ok(Json(DashboardResponse {
        xp_progress: student.xp_progress(),
        student: StudentView::from(&student),
        quick_missions,
        active_missions: active.len(),
    }))
}
