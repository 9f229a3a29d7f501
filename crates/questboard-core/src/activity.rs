//! Learning activity completion.

use chrono::Utc;
use serde::Serialize;

use crate::catalog::Activity;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::rewards::{evaluate_achievements, evaluate_level};
use crate::student::ActivityCompletion;

/// Result of completing an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityOutcome {
    /// First completion; the reward was credited.
    Completed {
        /// Points credited.
        reward_points: i64,
    },
    /// The activity had been completed before; nothing changed.
    AlreadyCompleted,
}

/// Complete `activity` once, crediting its flat point reward.
///
/// Grants no experience. A repeated completion returns
/// [`ActivityOutcome::AlreadyCompleted`] and stages nothing.
///
/// # Errors
///
/// Returns an error if the ledger cannot read existing completions.
pub fn complete_activity<L: Ledger + ?Sized>(ledger: &mut L, activity: &Activity) -> Result<ActivityOutcome> {
    if ledger.activity_completion(activity.id)?.is_some() {
        tracing::debug!(
            student_id = %ledger.student().id,
            activity_id = %activity.id,
            "Activity already completed"
        );
        return Ok(ActivityOutcome::AlreadyCompleted);
    }

    let now = Utc::now();
    let student = ledger.student_mut();
    student.points += activity.reward_points;
    student.updated_at = now;
    let student_id = student.id;

    ledger.record_activity_completion(ActivityCompletion {
        student_id,
        activity_id: activity.id,
        completed_at: now,
    });

    tracing::info!(
        student_id = %student_id,
        activity_id = %activity.id,
        reward_points = activity.reward_points,
        "Activity completed"
    );

    evaluate_level(ledger)?;
    evaluate_achievements(ledger)?;

    Ok(ActivityOutcome::Completed {
        reward_points: activity.reward_points,
    })
}
