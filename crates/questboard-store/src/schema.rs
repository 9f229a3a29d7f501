//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Student records, keyed by `student_id`.
    pub const STUDENTS: &str = "students";

    /// Unique index: display name -> `student_id`.
    pub const STUDENTS_BY_NAME: &str = "students_by_name";

    /// Unique index: normalized email -> `student_id`.
    pub const STUDENTS_BY_EMAIL: &str = "students_by_email";

    /// Shop items, keyed by `item_id`.
    pub const ITEMS: &str = "items";

    /// Missions, keyed by `mission_id`.
    pub const MISSIONS: &str = "missions";

    /// Index: missions by trigger, keyed by `trigger || 0x00 || mission_id`.
    /// Value is empty (index only).
    pub const MISSIONS_BY_TRIGGER: &str = "missions_by_trigger";

    /// Achievements, keyed by `achievement_id`.
    pub const ACHIEVEMENTS: &str = "achievements";

    /// Learning activities, keyed by `activity_id`.
    pub const ACTIVITIES: &str = "activities";

    /// Owned items, keyed by `student_id || item_id`.
    pub const INVENTORY: &str = "inventory";

    /// Mission progress, keyed by `student_id || mission_id`.
    pub const MISSION_PROGRESS: &str = "mission_progress";

    /// Held achievements, keyed by `student_id || achievement_id`.
    pub const STUDENT_ACHIEVEMENTS: &str = "student_achievements";

    /// Activity completions, keyed by `student_id || activity_id`.
    pub const ACTIVITY_COMPLETIONS: &str = "activity_completions";
}

/// Column families holding per-student rows, cleared by a progress reset.
pub const STUDENT_RECORD_FAMILIES: [&str; 4] = [
    cf::INVENTORY,
    cf::MISSION_PROGRESS,
    cf::STUDENT_ACHIEVEMENTS,
    cf::ACTIVITY_COMPLETIONS,
];

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::STUDENTS,
        cf::STUDENTS_BY_NAME,
        cf::STUDENTS_BY_EMAIL,
        cf::ITEMS,
        cf::MISSIONS,
        cf::MISSIONS_BY_TRIGGER,
        cf::ACHIEVEMENTS,
        cf::ACTIVITIES,
        cf::INVENTORY,
        cf::MISSION_PROGRESS,
        cf::STUDENT_ACHIEVEMENTS,
        cf::ACTIVITY_COMPLETIONS,
    ]
}
