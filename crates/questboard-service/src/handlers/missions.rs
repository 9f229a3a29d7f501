//! Mission listing handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use questboard_core::{Mission, MissionId, MissionProgress};
use questboard_store::Store;

use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// A mission together with the student's progress on it.
#[derive(Debug, Serialize)]
pub struct MissionView {
    /// Mission ID.
    pub id: MissionId,
    /// Name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Mission kind label.
    pub code: String,
    /// Action trigger that advances it.
    pub trigger: String,
    /// Goal.
    pub goal: i64,
    /// Points paid on completion.
    pub reward_points: i64,
    /// Experience paid on completion.
    pub reward_xp: i64,
    /// Current counter.
    pub progress: i64,
    /// Whether the reward has been paid.
    pub completed: bool,
}

impl MissionView {
    pub(crate) fn new(mission: Mission, progress: Option<&MissionProgress>) -> Self {
        Self {
            id: mission.id,
            name: mission.name,
            description: mission.description,
            code: mission.code,
            trigger: mission.trigger,
            goal: mission.goal,
            reward_points: mission.reward_points,
            reward_xp: mission.reward_xp,
            progress: progress.map_or(0, |p| p.progress),
            completed: progress.is_some_and(|p| p.completed),
        }
    }
}

/// List every mission with the student's progress.
pub async fn list_missions(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<Vec<MissionView>>, ApiError> {
    let progress: HashMap<MissionId, MissionProgress> = state
        .store
        .list_mission_progress(&auth.student_id)?
        .into_iter()
        .map(|p| (p.mission_id, p))
        .collect();

    let missions = state
        .store
        .list_missions()?
        .into_iter()
        .map(|m| {
            let entry = progress.get(&m.id);
            MissionView::new(m, entry)
        })
        .collect();

    Ok(Json(missions))
}
