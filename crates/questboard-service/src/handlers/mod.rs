//! API handlers.

pub mod achievements;
pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod games;
pub mod health;
pub mod inventory;
pub mod missions;
pub mod progress;
pub mod ranking;
pub mod settings;
pub mod shop;

use serde::Serialize;

use questboard_core::{Notice, Student, StudentId};
use questboard_store::{Committed, RocksStore, UnitOfWork};

use crate::error::ApiError;
use crate::state::AppState;

/// Public view of a student.
#[derive(Debug, Serialize)]
pub struct StudentView {
    /// Student ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Point balance.
    pub points: i64,
    /// Cumulative experience.
    pub xp: i64,
    /// Current level.
    pub level: u32,
    /// Equipped avatar file.
    pub avatar: Option<String>,
    /// Equipped frame file.
    pub frame: Option<String>,
    /// Equipped background file.
    pub background: Option<String>,
}

impl From<&Student> for StudentView {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.to_string(),
            name: student.name.clone(),
            email: student.email.clone(),
            points: student.points,
            xp: student.xp,
            level: student.level,
            avatar: student.cosmetics.avatar.clone(),
            frame: student.cosmetics.frame.clone(),
            background: student.cosmetics.background.clone(),
        }
    }
}

/// Response of every mutating endpoint.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    /// Short human-readable outcome.
    pub message: String,
    /// The student after the commit.
    pub student: StudentView,
    /// Rewards earned along the way.
    pub notices: Vec<Notice>,
}

impl MutationResponse {
    fn new(message: impl Into<String>, committed: &Committed) -> Self {
        Self {
            message: message.into(),
            student: StudentView::from(&committed.student),
            notices: committed.notices.clone(),
        }
    }
}

/// Run `work` against a fresh unit of work for the student and commit it.
///
/// An error from `work` or from the commit discards every staged change.
fn run_unit_of_work<T>(
    state: &AppState,
    student_id: &StudentId,
    work: impl FnOnce(&mut UnitOfWork<'_, RocksStore>) -> Result<T, ApiError>,
) -> Result<(T, Committed), ApiError> {
    let mut uow = UnitOfWork::begin(state.store.as_ref(), student_id)?;
    let value = work(&mut uow)?;
    let committed = uow.commit()?;
    Ok((value, committed))
}
