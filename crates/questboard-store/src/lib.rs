//! `RocksDB` storage layer for questboard.
//!
//! This crate provides persistent storage for students, the catalog and the
//! per-student records (inventory, mission progress, achievements, activity
//! history), plus the [`UnitOfWork`] that stages one request's changes and
//! commits them atomically.
//!
//! # Architecture
//!
//! Catalog rows live in `items`, `missions`, `achievements` and `activities`.
//! Students live in `students` with unique indexes on name and email.
//! Per-student rows are keyed `student_id || catalog_id` so a student's
//! records can be listed, or wiped on reset, with one prefix scan.
//!
//! # Example
//!
//! ```no_run
//! use questboard_core::{purchase, ItemId};
//! use questboard_store::{RocksStore, Store, UnitOfWork};
//! # fn run(student_id: questboard_core::StudentId) -> Result<(), Box<dyn std::error::Error>> {
//! let store = RocksStore::open("/tmp/questboard-db")?;
//! let item = store.get_item(ItemId::new(1))?.expect("seeded item");
//!
//! let mut uow = UnitOfWork::begin(&store, &student_id)?;
//! purchase(&mut uow, &item)?;
//! let committed = uow.commit()?;
//! println!("{} points left", committed.student.points);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod unit_of_work;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;
pub use unit_of_work::{ChangeSet, Committed, UnitOfWork};

use questboard_core::{
    Achievement, AchievementGrant, AchievementId, Activity, ActivityCompletion, ActivityId,
    Catalog, InventoryEntry, Item, ItemId, Mission, MissionId, MissionProgress, Student,
    StudentId,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // Student Operations
    // =========================================================================

    /// Insert a new student, claiming its name and email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the name or email is taken.
    fn create_student(&self, student: &Student) -> Result<()>;

    /// Get a student by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_student(&self, student_id: &StudentId) -> Result<Option<Student>>;

    /// Look up a student by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_student_by_email(&self, email: &str) -> Result<Option<Student>>;

    /// Look up a student by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_student_by_name(&self, name: &str) -> Result<Option<Student>>;

    /// List every student.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_students(&self) -> Result<Vec<Student>>;

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Get a shop item.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_item(&self, item_id: ItemId) -> Result<Option<Item>>;

    /// List shop items in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_items(&self) -> Result<Vec<Item>>;

    /// Get a mission.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_mission(&self, mission_id: MissionId) -> Result<Option<Mission>>;

    /// List missions in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_missions(&self) -> Result<Vec<Mission>>;

    /// List the missions fired by an action trigger.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn missions_by_trigger(&self, trigger: &str) -> Result<Vec<Mission>>;

    /// Whether any mission exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn has_missions(&self) -> Result<bool>;

    /// List achievements in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_achievements(&self) -> Result<Vec<Achievement>>;

    /// Get an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_activity(&self, activity_id: ActivityId) -> Result<Option<Activity>>;

    /// List activities in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_activities(&self) -> Result<Vec<Activity>>;

    /// Insert the whole catalog atomically if no mission exists yet.
    ///
    /// Returns `true` if the catalog was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn seed_catalog(&self, catalog: &Catalog) -> Result<bool>;

    // =========================================================================
    // Per-Student Records
    // =========================================================================

    /// Get an inventory entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_inventory_entry(&self, student_id: &StudentId, item_id: ItemId)
        -> Result<Option<InventoryEntry>>;

    /// List a student's inventory.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_inventory(&self, student_id: &StudentId) -> Result<Vec<InventoryEntry>>;

    /// Get a student's progress on one mission.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_mission_progress(
        &self,
        student_id: &StudentId,
        mission_id: MissionId,
    ) -> Result<Option<MissionProgress>>;

    /// List a student's mission progress records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_mission_progress(&self, student_id: &StudentId) -> Result<Vec<MissionProgress>>;

    /// Get a held achievement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_student_achievement(
        &self,
        student_id: &StudentId,
        achievement_id: AchievementId,
    ) -> Result<Option<AchievementGrant>>;

    /// List a student's achievements.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_student_achievements(&self, student_id: &StudentId) -> Result<Vec<AchievementGrant>>;

    /// Get a student's completion of one activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_activity_completion(
        &self,
        student_id: &StudentId,
        activity_id: ActivityId,
    ) -> Result<Option<ActivityCompletion>>;

    /// List a student's completed activities.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_activity_completions(&self, student_id: &StudentId) -> Result<Vec<ActivityCompletion>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Apply a unit of work's change set atomically.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the student no longer exists.
    /// - `StoreError::Conflict` if a changed name or email is taken.
    fn commit(&self, changes: &ChangeSet) -> Result<()>;
}
