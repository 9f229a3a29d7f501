//! In-memory ledger used by the engine unit tests.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use crate::catalog::{Achievement, Mission};
use crate::error::Result;
use crate::ids::{AchievementId, ActivityId, ItemId, MissionId};
use crate::ledger::{Ledger, Notice};
use crate::seed::Catalog;
use crate::student::{ActivityCompletion, InventoryEntry, MissionProgress, Student};

pub(crate) struct MemoryLedger {
    pub catalog: Catalog,
    pub student: Student,
    pub progress: BTreeMap<MissionId, MissionProgress>,
    pub achievements: BTreeSet<AchievementId>,
    pub inventory: BTreeSet<ItemId>,
    pub completions: BTreeMap<ActivityId, ActivityCompletion>,
    pub notices: Vec<Notice>,
}

impl MemoryLedger {
    pub fn seeded() -> Self {
        Self {
            catalog: Catalog::default_seed(),
            student: Student::new("tester".into(), "tester@example.com".into(), "hash".into()),
            progress: BTreeMap::new(),
            achievements: BTreeSet::new(),
            inventory: BTreeSet::new(),
            completions: BTreeMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn progress_of(&self, mission_id: MissionId) -> Option<&MissionProgress> {
        self.progress.get(&mission_id)
    }

    /// Mark a mission as already completed without paying its reward.
    pub fn save_completed(&mut self, mission_id: MissionId) {
        let goal = self
            .catalog
            .missions
            .iter()
            .find(|m| m.id == mission_id)
            .map_or(1, |m| m.goal);
        let mut progress = MissionProgress::new(self.student.id, mission_id);
        progress.progress = goal;
        progress.completed = true;
        self.progress.insert(mission_id, progress);
    }
}

impl Ledger for MemoryLedger {
    fn student(&self) -> &Student {
        &self.student
    }

    fn student_mut(&mut self) -> &mut Student {
        &mut self.student
    }

    fn missions_for_trigger(&self, trigger: &str) -> Result<Vec<Mission>> {
        Ok(self
            .catalog
            .missions
            .iter()
            .filter(|m| m.trigger == trigger)
            .cloned()
            .collect())
    }

    fn mission_progress(&self, mission_id: MissionId) -> Result<Option<MissionProgress>> {
        Ok(self.progress.get(&mission_id).cloned())
    }

    fn save_mission_progress(&mut self, progress: MissionProgress) {
        self.progress.insert(progress.mission_id, progress);
    }

    fn achievements(&self) -> Result<Vec<Achievement>> {
        Ok(self.catalog.achievements.clone())
    }

    fn holds_achievement(&self, achievement_id: AchievementId) -> Result<bool> {
        Ok(self.achievements.contains(&achievement_id))
    }

    fn grant_achievement(&mut self, achievement_id: AchievementId) {
        self.achievements.insert(achievement_id);
    }

    fn owns_item(&self, item_id: ItemId) -> Result<bool> {
        Ok(self.inventory.contains(&item_id))
    }

    fn add_inventory_entry(&mut self, entry: InventoryEntry) {
        self.inventory.insert(entry.item_id);
    }

    fn activity_completion(&self, activity_id: ActivityId) -> Result<Option<ActivityCompletion>> {
        Ok(self.completions.get(&activity_id).cloned())
    }

    fn record_activity_completion(&mut self, completion: ActivityCompletion) {
        self.completions.insert(completion.activity_id, completion);
    }

    fn clear_student_records(&mut self) {
        self.progress.clear();
        self.achievements.clear();
        self.inventory.clear();
        self.completions.clear();
        self.student.updated_at = Utc::now();
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
