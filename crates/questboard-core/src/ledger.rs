//! The per-request view of one student's state that the reward engine mutates.
//!
//! A [`Ledger`] is a unit of work: reads see staged changes first, writes are
//! staged in memory, and nothing reaches storage until the owner commits it.
//! Dropping a ledger without committing discards every change.

use serde::Serialize;

use crate::catalog::{Achievement, Mission};
use crate::error::Result;
use crate::ids::{AchievementId, ActivityId, ItemId, MissionId};
use crate::student::{ActivityCompletion, InventoryEntry, MissionProgress, Student};

/// Something the student should be told about after the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A mission reached its goal and paid out.
    MissionCompleted {
        /// Mission id.
        mission_id: MissionId,
        /// Mission name.
        name: String,
        /// Points paid.
        reward_points: i64,
        /// Experience paid.
        reward_xp: i64,
    },
    /// The student reached a new level.
    LevelUp {
        /// The new level.
        level: u32,
    },
    /// An achievement was unlocked.
    AchievementUnlocked {
        /// Achievement id.
        achievement_id: AchievementId,
        /// Achievement name.
        name: String,
    },
}

/// Staged access to one student's records.
pub trait Ledger {
    /// The student as currently staged.
    fn student(&self) -> &Student;

    /// Mutable access to the staged student.
    fn student_mut(&mut self) -> &mut Student;

    /// Every mission whose trigger label equals `trigger`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn missions_for_trigger(&self, trigger: &str) -> Result<Vec<Mission>>;

    /// The student's progress on a mission, if any record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    fn mission_progress(&self, mission_id: MissionId) -> Result<Option<MissionProgress>>;

    /// Stage a created or updated progress record.
    fn save_mission_progress(&mut self, progress: MissionProgress);

    /// The full achievement catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn achievements(&self) -> Result<Vec<Achievement>>;

    /// Whether the student already holds an achievement.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    fn holds_achievement(&self, achievement_id: AchievementId) -> Result<bool>;

    /// Stage an achievement grant.
    fn grant_achievement(&mut self, achievement_id: AchievementId);

    /// Whether the student owns an item.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    fn owns_item(&self, item_id: ItemId) -> Result<bool>;

    /// Stage a new inventory entry.
    fn add_inventory_entry(&mut self, entry: InventoryEntry);

    /// The student's completion record for an activity, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read.
    fn activity_completion(&self, activity_id: ActivityId) -> Result<Option<ActivityCompletion>>;

    /// Stage an activity completion.
    fn record_activity_completion(&mut self, completion: ActivityCompletion);

    /// Stage deletion of all inventory, mission progress, achievements and
    /// activity history for the student, including anything staged earlier.
    fn clear_student_records(&mut self);

    /// Queue a notice for the response.
    fn notify(&mut self, notice: Notice);
}
