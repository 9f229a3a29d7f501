//! Student accounts and their per-student records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ItemCategory;
use crate::ids::{AchievementId, ActivityId, ItemId, MissionId, StudentId};
use crate::leveling::XpProgress;

/// Avatar equipped on new and reset students.
pub const DEFAULT_AVATAR: &str = "avatar-1.png";

/// Frame equipped on new and reset students.
pub const DEFAULT_FRAME: &str = "marco-1.png";

/// Minimum display name length, in characters.
pub const NAME_MIN_CHARS: usize = 3;

/// Maximum display name length, in characters.
pub const NAME_MAX_CHARS: usize = 30;

/// Minimum password length, in characters.
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Equipped cosmetic references, one slot per [`ItemCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cosmetics {
    /// Avatar image file name.
    pub avatar: Option<String>,
    /// Frame image file name.
    pub frame: Option<String>,
    /// Background image file name.
    pub background: Option<String>,
}

impl Cosmetics {
    /// The slot that items of `category` equip into.
    pub fn slot_mut(&mut self, category: ItemCategory) -> &mut Option<String> {
        match category {
            ItemCategory::Avatar => &mut self.avatar,
            ItemCategory::Frame => &mut self.frame,
            ItemCategory::Background => &mut self.background,
        }
    }

    /// Read-only view of a slot.
    #[must_use]
    pub fn slot(&self, category: ItemCategory) -> Option<&str> {
        match category {
            ItemCategory::Avatar => self.avatar.as_deref(),
            ItemCategory::Frame => self.frame.as_deref(),
            ItemCategory::Background => self.background.as_deref(),
        }
    }
}

impl Default for Cosmetics {
    fn default() -> Self {
        Self {
            avatar: Some(DEFAULT_AVATAR.to_string()),
            frame: Some(DEFAULT_FRAME.to_string()),
            background: None,
        }
    }
}

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student id.
    pub id: StudentId,
    /// Unique display name.
    pub name: String,
    /// Unique email, stored lower-cased.
    pub email: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Spendable points.
    pub points: i64,
    /// Cumulative experience.
    pub xp: i64,
    /// Current level, starting at 1.
    pub level: u32,
    /// Equipped cosmetics.
    pub cosmetics: Cosmetics,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Create a fresh student at level 1 with default cosmetics.
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: StudentId::generate(),
            name,
            email,
            password_hash,
            points: 0,
            xp: 0,
            level: 1,
            cosmetics: Cosmetics::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the student can pay `price`.
    #[must_use]
    pub fn has_sufficient_points(&self, price: i64) -> bool {
        self.points >= price
    }

    /// Experience progress inside the current level.
    #[must_use]
    pub fn xp_progress(&self) -> XpProgress {
        XpProgress::new(self.xp, self.level)
    }

    /// Restore points, experience, level and cosmetics to their defaults.
    ///
    /// Per-student rows (inventory, missions, achievements, activity history)
    /// are cleared by the unit of work, not here.
    pub fn reset_progress(&mut self) {
        self.points = 0;
        self.xp = 0;
        self.level = 1;
        self.cosmetics = Cosmetics::default();
        self.updated_at = Utc::now();
    }
}

/// Validate a display name: trimmed, 3 to 30 characters.
///
/// # Errors
///
/// Returns a message describing the violated rule.
pub fn validate_name(name: &str) -> Result<(), String> {
    let len = name.chars().count();
    if name.trim() != name || name.is_empty() {
        return Err("name must not be empty or padded with spaces".into());
    }
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        return Err(format!(
            "name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"
        ));
    }
    Ok(())
}

/// Validate a password length.
///
/// # Errors
///
/// Returns a message when the password is too short.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN_CHARS {
        return Err(format!(
            "password must be at least {PASSWORD_MIN_CHARS} characters"
        ));
    }
    Ok(())
}

/// Normalize an email for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Ownership edge between a student and a shop item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Owner.
    pub student_id: StudentId,
    /// Owned item.
    pub item_id: ItemId,
    /// Purchase time.
    pub acquired_at: DateTime<Utc>,
}

/// Progress of one student on one mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionProgress {
    /// Student.
    pub student_id: StudentId,
    /// Mission.
    pub mission_id: MissionId,
    /// Counter, capped at the mission goal.
    pub progress: i64,
    /// Whether the reward has been paid.
    pub completed: bool,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl MissionProgress {
    /// A zeroed record, created lazily on the first matching event.
    #[must_use]
    pub fn new(student_id: StudentId, mission_id: MissionId) -> Self {
        Self {
            student_id,
            mission_id,
            progress: 0,
            completed: false,
            updated_at: Utc::now(),
        }
    }
}

/// An achievement held by a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementGrant {
    /// Holder.
    pub student_id: StudentId,
    /// Achievement.
    pub achievement_id: AchievementId,
    /// When it was unlocked.
    pub granted_at: DateTime<Utc>,
}

/// A completed activity; at most one per (student, activity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCompletion {
    /// Student.
    pub student_id: StudentId,
    /// Activity.
    pub activity_id: ActivityId,
    /// Completion time.
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student::new("ana".into(), "ana@example.com".into(), "hash".into())
    }

    #[test]
    fn new_student_defaults() {
        let s = student();
        assert_eq!(s.points, 0);
        assert_eq!(s.xp, 0);
        assert_eq!(s.level, 1);
        assert_eq!(s.cosmetics.avatar.as_deref(), Some(DEFAULT_AVATAR));
        assert_eq!(s.cosmetics.frame.as_deref(), Some(DEFAULT_FRAME));
        assert!(s.cosmetics.background.is_none());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = student();
        s.points = 500;
        s.xp = 420;
        s.level = 5;
        s.cosmetics.avatar = Some("avatar-3.png".into());
        s.cosmetics.background = Some("fondo-2.png".into());

        s.reset_progress();

        assert_eq!(s.points, 0);
        assert_eq!(s.xp, 0);
        assert_eq!(s.level, 1);
        assert_eq!(s.cosmetics, Cosmetics::default());
    }

    #[test]
    fn slots_map_to_categories() {
        let mut c = Cosmetics::default();
        *c.slot_mut(ItemCategory::Background) = Some("bg.png".into());
        assert_eq!(c.slot(ItemCategory::Background), Some("bg.png"));
        assert_eq!(c.slot(ItemCategory::Frame), Some(DEFAULT_FRAME));
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("ana").is_ok());
        assert!(validate_name("an").is_err());
        assert!(validate_name(&"x".repeat(31)).is_err());
        assert!(validate_name(" ana").is_err());
        assert!(validate_name("José").is_ok());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
