//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use questboard_core::{
    Achievement, AchievementGrant, AchievementId, Activity, ActivityCompletion, ActivityId,
    Catalog, InventoryEntry, Item, ItemId, Mission, MissionId, MissionProgress, Student,
    StudentId,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf, STUDENT_RECORD_FAMILIES};
use crate::unit_of_work::ChangeSet;
use crate::Store;

/// RocksDB-backed storage implementation.
///
/// Writes that check a unique index before writing it hold `write_lock`
/// from the check until the batch lands.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Serialize check-then-write sequences.
    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Read and decode a single value.
    fn get_value<T: DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Collect every key starting with `prefix`, in key order.
    fn keys_with_prefix(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<Box<[u8]>>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut found = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            found.push(key);
        }
        Ok(found)
    }

    /// Decode every value whose key starts with `prefix`, in key order.
    fn values_with_prefix<T: DeserializeOwned>(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        let mut values = Vec::new();
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            values.push(Self::deserialize(&value)?);
        }
        Ok(values)
    }

    /// Resolve a unique index entry to the student it points at.
    fn student_by_index(&self, cf_name: &str, value: &str) -> Result<Option<Student>> {
        let cf = self.cf(cf_name)?;
        let Some(raw_id) = self
            .db
            .get_cf(&cf, keys::unique_key(value))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let student_id = keys::decode_student_id(&raw_id)
            .ok_or_else(|| StoreError::Serialization(format!("corrupt index entry in {cf_name}")))?;
        self.get_student(&student_id)
    }

    /// Fail if `value` is indexed to a student other than `owner`.
    fn ensure_unique(
        &self,
        cf_name: &str,
        field: &'static str,
        value: &str,
        owner: &StudentId,
    ) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let existing = self
            .db
            .get_cf(&cf, keys::unique_key(value))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        match existing.as_deref().and_then(keys::decode_student_id) {
            Some(holder) if holder != *owner => Err(StoreError::Conflict {
                field,
                value: value.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Stage an updated unique index entry, dropping the previous value.
    fn reindex(
        &self,
        batch: &mut WriteBatch,
        cf_name: &str,
        field: &'static str,
        previous: &str,
        current: &str,
        owner: &StudentId,
    ) -> Result<()> {
        if previous == current {
            return Ok(());
        }
        self.ensure_unique(cf_name, field, current, owner)?;

        let cf = self.cf(cf_name)?;
        batch.delete_cf(&cf, keys::unique_key(previous));
        batch.put_cf(&cf, keys::unique_key(current), keys::student_key(owner));
        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Student Operations
    // =========================================================================

    fn create_student(&self, student: &Student) -> Result<()> {
        let _guard = self.lock_writes()?;
        self.ensure_unique(cf::STUDENTS_BY_EMAIL, "email", &student.email, &student.id)?;
        self.ensure_unique(cf::STUDENTS_BY_NAME, "name", &student.name, &student.id)?;

        let cf_students = self.cf(cf::STUDENTS)?;
        let cf_by_name = self.cf(cf::STUDENTS_BY_NAME)?;
        let cf_by_email = self.cf(cf::STUDENTS_BY_EMAIL)?;

        let key = keys::student_key(&student.id);
        let value = Self::serialize(student)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_students, &key, &value);
        batch.put_cf(&cf_by_name, keys::unique_key(&student.name), &key);
        batch.put_cf(&cf_by_email, keys::unique_key(&student.email), &key);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(student_id = %student.id, "Student stored");
        Ok(())
    }

    fn get_student(&self, student_id: &StudentId) -> Result<Option<Student>> {
        self.get_value(cf::STUDENTS, &keys::student_key(student_id))
    }

    fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.student_by_index(cf::STUDENTS_BY_EMAIL, email)
    }

    fn find_student_by_name(&self, name: &str) -> Result<Option<Student>> {
        self.student_by_index(cf::STUDENTS_BY_NAME, name)
    }

    fn list_students(&self) -> Result<Vec<Student>> {
        self.values_with_prefix(cf::STUDENTS, &[])
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        self.get_value(cf::ITEMS, &keys::catalog_key(item_id.to_be_bytes()))
    }

    fn list_items(&self) -> Result<Vec<Item>> {
        self.values_with_prefix(cf::ITEMS, &[])
    }

    fn get_mission(&self, mission_id: MissionId) -> Result<Option<Mission>> {
        self.get_value(cf::MISSIONS, &keys::catalog_key(mission_id.to_be_bytes()))
    }

    fn list_missions(&self) -> Result<Vec<Mission>> {
        self.values_with_prefix(cf::MISSIONS, &[])
    }

    fn missions_by_trigger(&self, trigger: &str) -> Result<Vec<Mission>> {
        let prefix = keys::trigger_prefix(trigger);
        let mut missions = Vec::new();

        for key in self.keys_with_prefix(cf::MISSIONS_BY_TRIGGER, &prefix)? {
            let id_bytes = keys::trailing_catalog_id(&key).ok_or_else(|| {
                StoreError::Serialization("corrupt mission trigger index".into())
            })?;
            if let Some(mission) = self.get_mission(MissionId::from_be_bytes(id_bytes))? {
                missions.push(mission);
            }
        }

        Ok(missions)
    }

    fn has_missions(&self) -> Result<bool> {
        let cf = self.cf(cf::MISSIONS)?;
        let mut iter = self.db.iterator_cf(&cf, IteratorMode::Start);
        match iter.next() {
            Some(item) => item
                .map(|_| true)
                .map_err(|e| StoreError::Database(e.to_string())),
            None => Ok(false),
        }
    }

    fn list_achievements(&self) -> Result<Vec<Achievement>> {
        self.values_with_prefix(cf::ACHIEVEMENTS, &[])
    }

    fn get_activity(&self, activity_id: ActivityId) -> Result<Option<Activity>> {
        self.get_value(cf::ACTIVITIES, &keys::catalog_key(activity_id.to_be_bytes()))
    }

    fn list_activities(&self) -> Result<Vec<Activity>> {
        self.values_with_prefix(cf::ACTIVITIES, &[])
    }

    fn seed_catalog(&self, catalog: &Catalog) -> Result<bool> {
        let _guard = self.lock_writes()?;
        if self.has_missions()? {
            return Ok(false);
        }

        let cf_items = self.cf(cf::ITEMS)?;
        let cf_missions = self.cf(cf::MISSIONS)?;
        let cf_by_trigger = self.cf(cf::MISSIONS_BY_TRIGGER)?;
        let cf_achievements = self.cf(cf::ACHIEVEMENTS)?;
        let cf_activities = self.cf(cf::ACTIVITIES)?;

        let mut batch = WriteBatch::default();
        for item in &catalog.items {
            batch.put_cf(&cf_items, keys::catalog_key(item.id.to_be_bytes()), Self::serialize(item)?);
        }
        for mission in &catalog.missions {
            let id_bytes = mission.id.to_be_bytes();
            batch.put_cf(&cf_missions, keys::catalog_key(id_bytes), Self::serialize(mission)?);
            batch.put_cf(&cf_by_trigger, keys::trigger_key(&mission.trigger, id_bytes), b"");
        }
        for achievement in &catalog.achievements {
            batch.put_cf(
                &cf_achievements,
                keys::catalog_key(achievement.id.to_be_bytes()),
                Self::serialize(achievement)?,
            );
        }
        for activity in &catalog.activities {
            batch.put_cf(
                &cf_activities,
                keys::catalog_key(activity.id.to_be_bytes()),
                Self::serialize(activity)?,
            );
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::info!(
            items = catalog.items.len(),
            missions = catalog.missions.len(),
            achievements = catalog.achievements.len(),
            activities = catalog.activities.len(),
            "Catalog seeded"
        );
        Ok(true)
    }

    // =========================================================================
    // Per-Student Records
    // =========================================================================

    fn get_inventory_entry(
        &self,
        student_id: &StudentId,
        item_id: ItemId,
    ) -> Result<Option<InventoryEntry>> {
        self.get_value(
            cf::INVENTORY,
            &keys::student_record_key(student_id, item_id.to_be_bytes()),
        )
    }

    fn list_inventory(&self, student_id: &StudentId) -> Result<Vec<InventoryEntry>> {
        self.values_with_prefix(cf::INVENTORY, &keys::student_records_prefix(student_id))
    }

    fn get_mission_progress(
        &self,
        student_id: &StudentId,
        mission_id: MissionId,
    ) -> Result<Option<MissionProgress>> {
        self.get_value(
            cf::MISSION_PROGRESS,
            &keys::student_record_key(student_id, mission_id.to_be_bytes()),
        )
    }

    fn list_mission_progress(&self, student_id: &StudentId) -> Result<Vec<MissionProgress>> {
        self.values_with_prefix(cf::MISSION_PROGRESS, &keys::student_records_prefix(student_id))
    }

    fn get_student_achievement(
        &self,
        student_id: &StudentId,
        achievement_id: AchievementId,
    ) -> Result<Option<AchievementGrant>> {
        self.get_value(
            cf::STUDENT_ACHIEVEMENTS,
            &keys::student_record_key(student_id, achievement_id.to_be_bytes()),
        )
    }

    fn list_student_achievements(&self, student_id: &StudentId) -> Result<Vec<AchievementGrant>> {
        self.values_with_prefix(
            cf::STUDENT_ACHIEVEMENTS,
            &keys::student_records_prefix(student_id),
        )
    }

    fn get_activity_completion(
        &self,
        student_id: &StudentId,
        activity_id: ActivityId,
    ) -> Result<Option<ActivityCompletion>> {
        self.get_value(
            cf::ACTIVITY_COMPLETIONS,
            &keys::student_record_key(student_id, activity_id.to_be_bytes()),
        )
    }

    fn list_activity_completions(&self, student_id: &StudentId) -> Result<Vec<ActivityCompletion>> {
        self.values_with_prefix(
            cf::ACTIVITY_COMPLETIONS,
            &keys::student_records_prefix(student_id),
        )
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn commit(&self, changes: &ChangeSet) -> Result<()> {
        let student = &changes.student;
        let _guard = self.lock_writes()?;
        let stored = self
            .get_student(&student.id)?
            .ok_or_else(|| StoreError::NotFound {
                entity: "student",
                id: student.id.to_string(),
            })?;

        let mut batch = WriteBatch::default();

        self.reindex(
            &mut batch,
            cf::STUDENTS_BY_NAME,
            "name",
            &stored.name,
            &student.name,
            &student.id,
        )?;
        self.reindex(
            &mut batch,
            cf::STUDENTS_BY_EMAIL,
            "email",
            &stored.email,
            &student.email,
            &student.id,
        )?;

        // Deletes go first so rows staged after a reset survive it.
        if changes.clear_records {
            let prefix = keys::student_records_prefix(&student.id);
            for family in STUDENT_RECORD_FAMILIES {
                let cf = self.cf(family)?;
                for key in self.keys_with_prefix(family, &prefix)? {
                    batch.delete_cf(&cf, key);
                }
            }
        }

        let cf_students = self.cf(cf::STUDENTS)?;
        batch.put_cf(&cf_students, keys::student_key(&student.id), Self::serialize(student)?);

        let cf_inventory = self.cf(cf::INVENTORY)?;
        for (item_id, entry) in &changes.inventory {
            batch.put_cf(
                &cf_inventory,
                keys::student_record_key(&student.id, item_id.to_be_bytes()),
                Self::serialize(entry)?,
            );
        }

        let cf_progress = self.cf(cf::MISSION_PROGRESS)?;
        for (mission_id, progress) in &changes.mission_progress {
            batch.put_cf(
                &cf_progress,
                keys::student_record_key(&student.id, mission_id.to_be_bytes()),
                Self::serialize(progress)?,
            );
        }

        let cf_achievements = self.cf(cf::STUDENT_ACHIEVEMENTS)?;
        for (achievement_id, grant) in &changes.achievements {
            batch.put_cf(
                &cf_achievements,
                keys::student_record_key(&student.id, achievement_id.to_be_bytes()),
                Self::serialize(grant)?,
            );
        }

        let cf_completions = self.cf(cf::ACTIVITY_COMPLETIONS)?;
        for (activity_id, completion) in &changes.completions {
            batch.put_cf(
                &cf_completions,
                keys::student_record_key(&student.id, activity_id.to_be_bytes()),
                Self::serialize(completion)?,
            );
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}
