//! Request-scoped staging of one student's changes.
//!
//! A [`UnitOfWork`] loads the student once, lets the reward engine read and
//! stage changes through [`Ledger`], and writes everything in a single batch
//! on [`UnitOfWork::commit`]. Dropping it without committing is a rollback.

use std::collections::BTreeMap;

use chrono::Utc;

use questboard_core::{
    Achievement, AchievementGrant, AchievementId, ActivityCompletion, ActivityId,
    InventoryEntry, ItemId, Ledger, Mission, MissionId, MissionProgress, Notice, Student,
    StudentId,
};

use crate::error::{Result, StoreError};
use crate::Store;

/// Everything a unit of work will write for its student.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// The student row as it will be stored.
    pub student: Student,
    /// Delete every stored per-student record before applying the rows below.
    pub clear_records: bool,
    /// Staged inventory entries.
    pub inventory: BTreeMap<ItemId, InventoryEntry>,
    /// Staged mission progress.
    pub mission_progress: BTreeMap<MissionId, MissionProgress>,
    /// Staged achievement grants.
    pub achievements: BTreeMap<AchievementId, AchievementGrant>,
    /// Staged activity completions.
    pub completions: BTreeMap<ActivityId, ActivityCompletion>,
}

impl ChangeSet {
    /// A change set that only rewrites the student row.
    #[must_use]
    pub fn new(student: Student) -> Self {
        Self {
            student,
            clear_records: false,
            inventory: BTreeMap::new(),
            mission_progress: BTreeMap::new(),
            achievements: BTreeMap::new(),
            completions: BTreeMap::new(),
        }
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone)]
pub struct Committed {
    /// The student as stored.
    pub student: Student,
    /// Notices raised while the work was staged.
    pub notices: Vec<Notice>,
}

/// Staged changes for one student against a [`Store`].
pub struct UnitOfWork<'a, S: Store + ?Sized> {
    store: &'a S,
    changes: ChangeSet,
    notices: Vec<Notice>,
}

impl<'a, S: Store + ?Sized> UnitOfWork<'a, S> {
    /// Load a student and start staging changes for it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the student does not exist.
    pub fn begin(store: &'a S, student_id: &StudentId) -> Result<Self> {
        let student = store
            .get_student(student_id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "student",
                id: student_id.to_string(),
            })?;

        Ok(Self {
            store,
            changes: ChangeSet::new(student),
            notices: Vec::new(),
        })
    }

    /// Notices raised so far.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Write every staged change in one batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if a changed name or email was claimed
    /// by another student, or a database error.
    pub fn commit(self) -> Result<Committed> {
        self.store.commit(&self.changes)?;

        tracing::debug!(
            student_id = %self.changes.student.id,
            cleared = self.changes.clear_records,
            notices = self.notices.len(),
            "Unit of work committed"
        );

        Ok(Committed {
            student: self.changes.student,
            notices: self.notices,
        })
    }

    fn student_id(&self) -> StudentId {
        self.changes.student.id
    }

    /// Stored rows are invisible once a reset has been staged.
    fn stored<T>(
        &self,
        read: impl FnOnce(&S, &StudentId) -> Result<Option<T>>,
    ) -> questboard_core::Result<Option<T>> {
        if self.changes.clear_records {
            return Ok(None);
        }
        Ok(read(self.store, &self.changes.student.id)?)
    }
}

impl<S: Store + ?Sized> Ledger for UnitOfWork<'_, S> {
    fn student(&self) -> &Student {
        &self.changes.student
    }

    fn student_mut(&mut self) -> &mut Student {
        &mut self.changes.student
    }

    fn missions_for_trigger(&self, trigger: &str) -> questboard_core::Result<Vec<Mission>> {
        Ok(self.store.missions_by_trigger(trigger)?)
    }

    fn mission_progress(
        &self,
        mission_id: MissionId,
    ) -> questboard_core::Result<Option<MissionProgress>> {
        if let Some(staged) = self.changes.mission_progress.get(&mission_id) {
            return Ok(Some(staged.clone()));
        }
        self.stored(|store, id| store.get_mission_progress(id, mission_id))
    }

    fn save_mission_progress(&mut self, progress: MissionProgress) {
        self.changes
            .mission_progress
            .insert(progress.mission_id, progress);
    }

    fn achievements(&self) -> questboard_core::Result<Vec<Achievement>> {
        Ok(self.store.list_achievements()?)
    }

    fn holds_achievement(&self, achievement_id: AchievementId) -> questboard_core::Result<bool> {
        if self.changes.achievements.contains_key(&achievement_id) {
            return Ok(true);
        }
        Ok(self
            .stored(|store, id| store.get_student_achievement(id, achievement_id))?
            .is_some())
    }

    fn grant_achievement(&mut self, achievement_id: AchievementId) {
        let grant = AchievementGrant {
            student_id: self.student_id(),
            achievement_id,
            granted_at: Utc::now(),
        };
        self.changes.achievements.insert(achievement_id, grant);
    }

    fn owns_item(&self, item_id: ItemId) -> questboard_core::Result<bool> {
        if self.changes.inventory.contains_key(&item_id) {
            return Ok(true);
        }
        Ok(self
            .stored(|store, id| store.get_inventory_entry(id, item_id))?
            .is_some())
    }

    fn add_inventory_entry(&mut self, entry: InventoryEntry) {
        self.changes.inventory.insert(entry.item_id, entry);
    }

    fn activity_completion(
        &self,
        activity_id: ActivityId,
    ) -> questboard_core::Result<Option<ActivityCompletion>> {
        if let Some(staged) = self.changes.completions.get(&activity_id) {
            return Ok(Some(staged.clone()));
        }
        self.stored(|store, id| store.get_activity_completion(id, activity_id))
    }

    fn record_activity_completion(&mut self, completion: ActivityCompletion) {
        self.changes
            .completions
            .insert(completion.activity_id, completion);
    }

    fn clear_student_records(&mut self) {
        self.changes.clear_records = true;
        self.changes.inventory.clear();
        self.changes.mission_progress.clear();
        self.changes.achievements.clear();
        self.changes.completions.clear();
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

impl<S: Store + ?Sized> std::fmt::Debug for UnitOfWork<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("changes", &self.changes)
            .field("notices", &self.notices)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RocksStore;
    use questboard_core::{
        complete_activity, process_action, purchase, reset_progress, triggers, ActivityOutcome,
        Catalog, GameError,
    };
    use tempfile::TempDir;

    fn seeded_store() -> (RocksStore, TempDir, StudentId) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        store.seed_catalog(&Catalog::default_seed()).unwrap();

        let student = Student::new("ana".into(), "ana@example.com".into(), "hash".into());
        store.create_student(&student).unwrap();
        (store, dir, student.id)
    }

    #[test]
    fn begin_unknown_student_fails() {
        let (store, _dir, _) = seeded_store();
        let result = UnitOfWork::begin(&store, &StudentId::generate());
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn commit_persists_engine_changes() {
        let (store, _dir, id) = seeded_store();

        let mut uow = UnitOfWork::begin(&store, &id).unwrap();
        process_action(&mut uow, triggers::PLAY_MEMORY, 1).unwrap();
        let committed = uow.commit().unwrap();

        // Mission 1 pays 10 points and 5 xp.
        assert_eq!(committed.student.points, 10);
        assert_eq!(committed.student.xp, 5);
        assert!(!committed.notices.is_empty());

        let stored = store.get_student(&id).unwrap().unwrap();
        assert_eq!(stored.points, 10);
        let progress = store.get_mission_progress(&id, MissionId::new(1)).unwrap().unwrap();
        assert!(progress.completed);
        let progress = store.get_mission_progress(&id, MissionId::new(2)).unwrap().unwrap();
        assert_eq!(progress.progress, 1);
        assert!(!progress.completed);
    }

    #[test]
    fn dropping_without_commit_discards() {
        let (store, _dir, id) = seeded_store();

        {
            let mut uow = UnitOfWork::begin(&store, &id).unwrap();
            process_action(&mut uow, triggers::PLAY_MEMORY, 1).unwrap();
            assert_eq!(uow.student().points, 10);
        }

        assert_eq!(store.get_student(&id).unwrap().unwrap().points, 0);
        assert!(store.list_mission_progress(&id).unwrap().is_empty());
    }

    #[test]
    fn staged_reads_see_staged_writes() {
        let (store, _dir, id) = seeded_store();
        let mut uow = UnitOfWork::begin(&store, &id).unwrap();
        uow.student_mut().points = 500;

        let item = store.get_item(ItemId::new(1)).unwrap().unwrap();
        purchase(&mut uow, &item).unwrap();

        assert!(uow.owns_item(ItemId::new(1)).unwrap());
        assert!(matches!(
            purchase(&mut uow, &item),
            Err(GameError::AlreadyOwned(_))
        ));
    }

    #[test]
    fn reset_clears_stored_records() {
        let (store, _dir, id) = seeded_store();

        let mut uow = UnitOfWork::begin(&store, &id).unwrap();
        uow.student_mut().points = 500;
        let item = store.get_item(ItemId::new(3)).unwrap().unwrap();
        purchase(&mut uow, &item).unwrap();
        let activity = store.get_activity(ActivityId::new(1)).unwrap().unwrap();
        assert!(matches!(
            complete_activity(&mut uow, &activity).unwrap(),
            ActivityOutcome::Completed { .. }
        ));
        uow.commit().unwrap();
        assert!(!store.list_inventory(&id).unwrap().is_empty());

        let mut uow = UnitOfWork::begin(&store, &id).unwrap();
        reset_progress(&mut uow);
        assert!(!uow.owns_item(ItemId::new(3)).unwrap());
        assert!(uow.activity_completion(ActivityId::new(1)).unwrap().is_none());
        uow.commit().unwrap();

        let student = store.get_student(&id).unwrap().unwrap();
        assert_eq!(student.points, 0);
        assert_eq!(student.xp, 0);
        assert_eq!(student.level, 1);
        assert!(store.list_inventory(&id).unwrap().is_empty());
        assert!(store.list_mission_progress(&id).unwrap().is_empty());
        assert!(store.list_student_achievements(&id).unwrap().is_empty());
        assert!(store.list_activity_completions(&id).unwrap().is_empty());
    }

    #[test]
    fn rename_to_taken_name_conflicts_and_rolls_back() {
        let (store, _dir, id) = seeded_store();
        let bob = Student::new("bob".into(), "bob@example.com".into(), "hash".into());
        store.create_student(&bob).unwrap();

        let mut uow = UnitOfWork::begin(&store, &id).unwrap();
        uow.student_mut().name = "bob".into();
        uow.student_mut().points = 42;

        assert!(matches!(uow.commit(), Err(StoreError::Conflict { field: "name", .. })));
        assert_eq!(store.get_student(&id).unwrap().unwrap().points, 0);
    }
}
