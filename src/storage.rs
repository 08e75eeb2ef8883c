//! JSON file persistence for the test collection.
//!
//! The whole collection is one serialized document in a single file. An
//! undecodable payload degrades to an empty collection — data loss, not a
//! fatal error — so a corrupt store never blocks ingestion.

use std::path::PathBuf;

use crate::repository::TestStore;
use crate::state::BatteryTest;

/// File-backed [`TestStore`] writing pretty-printed JSON.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the data directory path for packlog
    pub fn get_data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("Packlog"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("Packlog"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("packlog"))
        }
    }

    /// Default location of the persisted collection.
    pub fn default_path() -> Option<PathBuf> {
        Self::get_data_dir().map(|p| p.join("tests.json"))
    }

    /// Store at the per-platform default path.
    pub fn at_default_path() -> Option<Self> {
        Self::default_path().map(Self::new)
    }
}

impl TestStore for JsonFileStore {
    fn load(&self) -> anyhow::Result<Vec<BatteryTest>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(tests) => Ok(tests),
            Err(e) => {
                tracing::warn!(
                    "discarding undecodable test collection at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, tests: &[BatteryTest]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(tests)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_entity(id: &str) -> BatteryTest {
        BatteryTest {
            id: id.to_string(),
            file_name: format!("{id}.csv"),
            pack_number: 1,
            module_number: 2,
            upload_date: Utc::now(),
            records: vec![],
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("tests.json"));

        store.save(&[test_entity("a"), test_entity("b")]).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "a");
        assert_eq!(loaded[1].pack_number, 1);
    }

    #[test]
    fn test_missing_file_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("never-written.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_undecodable_payload_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.json");
        std::fs::write(&path, "{ not json ]").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/deeper/tests.json"));
        store.save(&[test_entity("a")]).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_upload_date_survives_disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("tests.json"));
        let original = test_entity("a");

        store.save(std::slice::from_ref(&original)).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded[0].upload_date, original.upload_date);
    }
}
