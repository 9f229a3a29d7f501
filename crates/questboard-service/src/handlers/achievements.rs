//! Achievement listing handler.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use questboard_core::AchievementId;
use questboard_store::Store;

use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// An achievement and whether the student holds it.
#[derive(Debug, Serialize)]
pub struct AchievementView {
    /// Achievement ID.
    pub id: AchievementId,
    /// Name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Badge image.
    pub image_url: Option<String>,
    /// Level that unlocks it.
    pub required_level: u32,
    /// Whether the student holds it.
    pub unlocked: bool,
    /// When it was unlocked (RFC 3339).
    pub unlocked_at: Option<String>,
}

/// List every achievement, flagging the ones the student holds.
pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<Vec<AchievementView>>, ApiError> {
    let held: HashMap<_, _> = state
        .store
        .list_student_achievements(&auth.student_id)?
        .into_iter()
        .map(|g| (g.achievement_id, g.granted_at))
        .collect();

    let achievements = state
        .store
        .list_achievements()?
        .into_iter()
        .map(|a| {
            let granted_at = held.get(&a.id);
            AchievementView {
                id: a.id,
                name: a.name,
                description: a.description,
                image_url: a.image_url,
                required_level: a.required_level,
                unlocked: granted_at.is_some(),
                unlocked_at: granted_at.map(chrono::DateTime::to_rfc3339),
            }
        })
        .collect();

    Ok(Json(achievements))
}
