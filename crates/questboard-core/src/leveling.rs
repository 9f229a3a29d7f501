//! Level thresholds.
//!
//! Leaving level `N` requires `N * 100` cumulative experience, so level 2 is
//! reached at 100 XP, level 3 at 200 XP, and so on.

use serde::Serialize;

/// Experience added to the threshold by each level.
pub const XP_PER_LEVEL: i64 = 100;

/// Cumulative experience needed to leave `level`.
#[must_use]
pub fn xp_threshold(level: u32) -> i64 {
    i64::from(level) * XP_PER_LEVEL
}

/// Where a student stands inside their current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct XpProgress {
    /// Current level.
    pub level: u32,
    /// Total experience.
    pub xp: i64,
    /// Experience earned since entering the current level.
    pub xp_in_level: i64,
    /// Cumulative experience at which the next level starts.
    pub xp_for_next_level: i64,
    /// Experience still missing for the next level.
    pub xp_remaining: i64,
    /// Progress through the current level, 0..=100.
    pub percent: i64,
}

impl XpProgress {
    /// Compute progress for the given totals.
    #[must_use]
    pub fn new(xp: i64, level: u32) -> Self {
        let xp_for_next_level = xp_threshold(level);
        let xp_in_level = if level > 1 {
            xp - xp_threshold(level - 1)
        } else {
            xp
        }
        .max(0);

        Self {
            level,
            xp,
            xp_in_level,
            xp_for_next_level,
            xp_remaining: (xp_for_next_level - xp).max(0),
            percent: (xp_in_level * 100 / XP_PER_LEVEL).min(100),
        }
    }
}
