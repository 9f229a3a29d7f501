//! Core types and reward engine for questboard.
//!
//! This crate provides the domain model of the gamification portal:
//!
//! - **Identifiers**: `StudentId`, and catalog ids `ItemId`, `MissionId`,
//!   `AchievementId`, `ActivityId`
//! - **Students**: `Student`, `Cosmetics`, and per-student records
//! - **Catalog**: `Item`, `Mission`, `Achievement`, `Activity`, action triggers
//! - **Engine**: mission fan-out, leveling, achievements, shop, activities,
//!   games and profile reset, all operating on a [`Ledger`]
//!
//! # Levels
//!
//! Leaving level `N` requires `N * 100` cumulative XP. Level evaluation runs
//! iteratively from the stored level, so one large reward can raise several
//! levels at once.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod activity;
pub mod catalog;
pub mod error;
pub mod games;
pub mod ids;
pub mod ledger;
pub mod leveling;
pub mod profile;
pub mod rewards;
pub mod seed;
pub mod shop;
pub mod student;

#[cfg(test)]
mod testing;

pub use activity::{complete_activity, ActivityOutcome};
pub use catalog::{triggers, Achievement, Activity, Item, ItemCategory, Mission, UnknownCategory};
pub use error::{GameError, Result};
pub use games::{record_game_result, Difficulty, DifficultyConfig, Game, GameOutcome};
pub use ids::{AchievementId, ActivityId, IdError, ItemId, MissionId, StudentId};
pub use ledger::{Ledger, Notice};
pub use leveling::{xp_threshold, XpProgress, XP_PER_LEVEL};
pub use profile::{reset_progress, set_uploaded_avatar};
pub use rewards::{evaluate_achievements, evaluate_level, process_action};
pub use seed::Catalog;
pub use shop::{equip, purchase};
pub use student::{
    AchievementGrant, ActivityCompletion, Cosmetics, InventoryEntry, MissionProgress, Student,
    DEFAULT_AVATAR, DEFAULT_FRAME,
};
