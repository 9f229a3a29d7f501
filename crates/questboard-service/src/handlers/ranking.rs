//! Ranking handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use questboard_core::Student;
use questboard_store::Store;

use crate::auth::AuthStudent;
use crate::error::ApiError;
use crate::state::AppState;

/// One row of the ranking.
#[derive(Debug, Serialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub position: usize,
    /// Student ID.
    pub student_id: String,
    /// Display name.
    pub name: String,
    /// Points.
    pub points: i64,
    /// Experience.
    pub xp: i64,
    /// Level.
    pub level: u32,
    /// Equipped avatar.
    pub avatar: Option<String>,
    /// Equipped frame.
    pub frame: Option<String>,
    /// Whether this row is the requesting student.
    pub is_me: bool,
}

/// Order students by points, then experience, both descending, then name.
fn rank(students: &mut [Student]) {
    students.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.xp.cmp(&a.xp))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Every student, best first.
pub async fn get_ranking(
    State(state): State<Arc<AppState>>,
    auth: AuthStudent,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    let mut students = state.store.list_students()?;
    rank(&mut students);

    let entries = students
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankingEntry {
            position: i + 1,
            student_id: s.id.to_string(),
            is_me: s.id == auth.student_id,
            name: s.name,
            points: s.points,
            xp: s.xp,
            level: s.level,
            avatar: s.cosmetics.avatar,
            frame: s.cosmetics.frame,
        })
        .collect();

    Ok(Json(entries))
}
