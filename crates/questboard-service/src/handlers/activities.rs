//! Learning activity handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use questboard_core::{complete_activity, Activity, ActivityId, ActivityOutcome, GameError, Notice};
use questboard_store::Store;

use super::{run_unit_of_work, StudentView};
use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// An activity with the student's completion flag.
#[derive(Debug, Serialize)]
pub struct ActivityView {
    /// The catalog activity.
    #[serde(flatten)]
    pub activity: Activity,
    /// Whether the student has completed it.
    pub completed: bool,
}

/// One entry of the activity history.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    /// Activity ID.
    pub activity_id: ActivityId,
    /// Activity name, if it is still in the catalog.
    pub name: Option<String>,
    /// Points the activity pays.
    pub reward_points: Option<i64>,
    /// Completion time (RFC 3339).
    pub completed_at: String,
}

/// Response to completing an activity.
#[derive(Debug, Serialize)]
pub struct CompleteActivityResponse {
    /// What happened.
    pub outcome: ActivityOutcome,
    /// Short human-readable outcome.
    pub message: String,
    /// The student after the commit.
    pub student: StudentView,
    /// Rewards earned along the way.
    pub notices: Vec<Notice>,
}

/// List every activity.
pub async fn list_activities(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<Vec<ActivityView>>, ApiError> {
    let done: Vec<ActivityId> = state
        .store
        .list_activity_completions(&auth.student_id)?
        .into_iter()
        .map(|c| c.activity_id)
        .collect();

    let activities = state
        .store
        .list_activities()?
        .into_iter()
        .map(|activity| ActivityView {
            completed: done.contains(&activity.id),
            activity,
        })
        .collect();

    Ok(Json(activities))
}

/// The student's completed activities, newest first.
pub async fn activity_history(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let catalog: HashMap<ActivityId, Activity> = state
        .store
        .list_activities()?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    let mut completions = state.store.list_activity_completions(&auth.student_id)?;
    completions.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));

    let history = completions
        .into_iter()
        .map(|c| {
            let activity = catalog.get(&c.activity_id);
            HistoryEntry {
                activity_id: c.activity_id,
                name: activity.map(|a| a.name.clone()),
                reward_points: activity.map(|a| a.reward_points),
                completed_at: c.completed_at.to_rfc3339(),
            }
        })
        .collect();

    Ok(Json(history))
}

/// Complete an activity once.
pub async fn complete(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
    Path(activity_id): Path<String>,
) -> Result<Json<CompleteActivityResponse>, ApiError> {
    let activity_id: ActivityId = activity_id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid activity id: {activity_id}")))?;
    let activity = state
        .store
        .get_activity(activity_id)?
        .ok_or(GameError::ActivityNotFound(activity_id))?;

    let (outcome, committed) = run_unit_of_work(&state, &auth.student_id, |uow| {
        complete_activity(uow, &activity).map_err(ApiError::from)
    })?;

    let message = match outcome {
        ActivityOutcome::Completed { reward_points } => {
            format!("Completed {} and earned {reward_points} points", activity.name)
        }
        ActivityOutcome::AlreadyCompleted => format!("{} was already completed", activity.name),
    };

    Ok(Json(CompleteActivityResponse {
        outcome,
        message,
        student: StudentView::from(&committed.student),
        notices: committed.notices,
    }))
}
