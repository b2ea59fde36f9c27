//! Persisted progression
//!
//! One JSON record at a well-known path: the active level plus one completion
//! flag per catalog entry. Every write replaces the whole record, so a partial
//! write can never leave mismatched fields on disk. Completion flags are
//! monotonic: once true they never revert.

use crate::core::error::{GameError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The persisted save record
///
/// Wire shape is `{"active": n, "completed": [bool, ...]}` with `completed`
/// index-aligned to the level catalog. There is no version field; a record
/// that fails validation is replaced by defaults on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub active: u32,
    pub completed: Vec<bool>,
}

impl ProgressRecord {
    /// Fresh record: level 1 active, nothing completed
    pub fn fresh(catalog_len: usize) -> Self {
        Self {
            active: 1,
            completed: vec![false; catalog_len],
        }
    }

    /// Check the record against the catalog it must be aligned with
    fn validate(&self, catalog_len: usize) -> Result<()> {
        if self.completed.len() != catalog_len {
            return Err(GameError::CorruptedProgress(format!(
                "completed has {} entries, catalog has {}",
                self.completed.len(),
                catalog_len
            )));
        }
        if self.active == 0 || self.active as usize > catalog_len {
            return Err(GameError::CorruptedProgress(format!(
                "active level {} outside catalog",
                self.active
            )));
        }
        Ok(())
    }
}

/// Durable store for the progression record
pub struct ProgressStore {
    path: PathBuf,
    catalog_len: usize,
}

impl ProgressStore {
    pub fn new(path: impl Into<PathBuf>, catalog_len: usize) -> Self {
        Self {
            path: path.into(),
            catalog_len,
        }
    }

    /// Load the persisted record, recovering to defaults on anything malformed
    ///
    /// Recovery is local: a missing, unreadable, or invalid record is replaced
    /// by a fresh one which is persisted before returning. Corruption never
    /// propagates to the caller.
    pub fn load(&self) -> Result<ProgressRecord> {
        match self.read_record() {
            Ok(record) => Ok(record),
            Err(e) => {
                tracing::warn!("Resetting progress to defaults: {}", e);
                let record = ProgressRecord::fresh(self.catalog_len);
                self.write_record(&record)?;
                Ok(record)
            }
        }
    }

    /// Overwrite the active level, preserving completion flags
    pub fn set_active_level(&self, number: u32) -> Result<()> {
        self.check_level(number)?;
        let mut record = self.load()?;
        record.active = number;
        self.write_record(&record)
    }

    /// Mark a level completed; idempotent, never un-sets a flag
    pub fn mark_completed(&self, number: u32) -> Result<()> {
        self.check_level(number)?;
        let mut record = self.load()?;
        let slot = &mut record.completed[number as usize - 1];
        if !*slot {
            *slot = true;
            tracing::info!("Level {} completed", number);
        }
        self.write_record(&record)
    }

    fn check_level(&self, number: u32) -> Result<()> {
        if number == 0 || number as usize > self.catalog_len {
            return Err(GameError::UnknownLevel(number));
        }
        Ok(())
    }

    fn read_record(&self) -> Result<ProgressRecord> {
        let text = std::fs::read_to_string(&self.path)?;
        let record: ProgressRecord = serde_json::from_str(&text)?;
        record.validate(self.catalog_len)?;
        Ok(record)
    }

    /// Whole-record write: serialize to a sibling temp file, then rename
    fn write_record(&self, record: &ProgressRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(dir: &tempfile::TempDir) -> ProgressStore {
        ProgressStore::new(dir.path().join("save.json"), 5)
    }

    #[test]
    fn test_fresh_load_creates_default() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        let record = store.load().unwrap();
        assert_eq!(record.active, 1);
        assert_eq!(record.completed, vec![false; 5]);
        // The default was persisted, not just returned
        assert!(store.path().exists());
    }

    #[test]
    fn test_mark_completed_idempotent() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        store.load().unwrap();

        store.mark_completed(2).unwrap();
        store.mark_completed(2).unwrap();

        let record = store.load().unwrap();
        assert_eq!(record.completed, vec![false, true, false, false, false]);
    }

    #[test]
    fn test_set_active_preserves_completion() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        store.mark_completed(1).unwrap();
        store.set_active_level(3).unwrap();

        let record = store.load().unwrap();
        assert_eq!(record.active, 3);
        assert!(record.completed[0]);
    }

    #[test]
    fn test_out_of_range_level_rejected() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        assert!(matches!(
            store.mark_completed(6),
            Err(GameError::UnknownLevel(6))
        ));
        assert!(matches!(
            store.set_active_level(0),
            Err(GameError::UnknownLevel(0))
        ));
    }

    #[test]
    fn test_corrupt_record_recovers_to_default() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        std::fs::write(store.path(), "{\"active\": 99}").unwrap();

        let record = store.load().unwrap();
        assert_eq!(record, ProgressRecord::fresh(5));
    }

    #[test]
    fn test_wrong_length_recovers_to_default() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        std::fs::write(store.path(), "{\"active\": 1, \"completed\": [true]}").unwrap();

        let record = store.load().unwrap();
        assert_eq!(record.completed.len(), 5);
        assert!(!record.completed[0]);
    }

    #[test]
    fn test_load_length_matches_catalog() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir);
        assert_eq!(store.load().unwrap().completed.len(), 5);
    }
}
