//! Registry store backends
//!
//! `FileRegistryStore` keeps one YAML file per window id in a shared
//! directory, plus a bounded ring of archived (genuinely closed) windows.
//! `MemoryRegistryStore` backs tests and single-process embeddings.

use super::{RegistryError, RegistryStore, WindowRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum number of archived closed-window records kept.
pub const ARCHIVED_WINDOWS_CAP: usize = 5;

const CLOSED_WINDOWS_FILE: &str = "closed-windows.yaml";

/// File-backed registry: `<dir>/<window_id>.yaml` per live window.
pub struct FileRegistryStore {
    dir: PathBuf,
}

impl FileRegistryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn record_path(&self, window_id: &str) -> PathBuf {
        self.dir.join(format!("{window_id}.yaml"))
    }

    fn closed_path(&self) -> PathBuf {
        self.dir.join(CLOSED_WINDOWS_FILE)
    }

    fn read_record(path: &Path) -> Result<Option<WindowRecord>, RegistryError> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_yaml_ng::from_str(&contents)?))
    }

    fn read_archived(&self) -> Vec<WindowRecord> {
        let path = self.closed_path();
        if !path.exists() {
            return Vec::new();
        }
        match fs::read_to_string(&path) {
            Ok(contents) => serde_yaml_ng::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Corrupt closed-windows ring at {:?}: {}", path, e);
                Vec::new()
            }),
            Err(e) => {
                log::warn!("Failed to read closed-windows ring {:?}: {}", path, e);
                Vec::new()
            }
        }
    }

    fn write_archived(&self, records: &[WindowRecord]) -> Result<(), RegistryError> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_yaml_ng::to_string(records)?;
        fs::write(self.closed_path(), contents)?;
        Ok(())
    }
}

impl RegistryStore for FileRegistryStore {
    fn load(&self, window_id: &str) -> Result<Option<WindowRecord>, RegistryError> {
        Self::read_record(&self.record_path(window_id))
    }

    fn save(&self, record: &WindowRecord) -> Result<(), RegistryError> {
        fs::create_dir_all(&self.dir)?;
        let contents = serde_yaml_ng::to_string(record)?;
        fs::write(self.record_path(&record.window_id), contents)?;
        Ok(())
    }

    fn remove(&self, window_id: &str) -> Result<(), RegistryError> {
        let path = self.record_path(window_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            // Another window's sweep may already have removed it
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<WindowRecord>, RegistryError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml")
                || path.file_name().and_then(|n| n.to_str()) == Some(CLOSED_WINDOWS_FILE)
            {
                continue;
            }
            match Self::read_record(&path) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Skipping corrupt window record {:?}: {}", path, e);
                }
            }
        }
        Ok(records)
    }

    fn archive(&self, window_id: &str) -> Result<(), RegistryError> {
        let Some(record) = self.load(window_id)? else {
            return Ok(());
        };

        let mut ring = self.read_archived();
        ring.retain(|r| r.window_id != record.window_id);
        ring.insert(0, record);
        ring.truncate(ARCHIVED_WINDOWS_CAP);
        self.write_archived(&ring)?;

        self.remove(window_id)
    }

    fn archived(&self) -> Result<Vec<WindowRecord>, RegistryError> {
        Ok(self.read_archived())
    }
}

/// In-memory registry for tests and single-process embeddings.
#[derive(Default)]
pub struct MemoryRegistryStore {
    records: Mutex<HashMap<String, WindowRecord>>,
    archived: Mutex<Vec<WindowRecord>>,
}

impl MemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegistryStore for MemoryRegistryStore {
    fn load(&self, window_id: &str) -> Result<Option<WindowRecord>, RegistryError> {
        Ok(self.records.lock().get(window_id).cloned())
    }

    fn save(&self, record: &WindowRecord) -> Result<(), RegistryError> {
        self.records
            .lock()
            .insert(record.window_id.clone(), record.clone());
        Ok(())
    }

    fn remove(&self, window_id: &str) -> Result<(), RegistryError> {
        self.records.lock().remove(window_id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<WindowRecord>, RegistryError> {
        Ok(self.records.lock().values().cloned().collect())
    }

    fn archive(&self, window_id: &str) -> Result<(), RegistryError> {
        let Some(record) = self.records.lock().remove(window_id) else {
            return Ok(());
        };
        let mut ring = self.archived.lock();
        ring.retain(|r| r.window_id != record.window_id);
        ring.insert(0, record);
        ring.truncate(ARCHIVED_WINDOWS_CAP);
        Ok(())
    }

    fn archived(&self) -> Result<Vec<WindowRecord>, RegistryError> {
        Ok(self.archived.lock().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::{Tab, TabType};
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(window_id: &str) -> WindowRecord {
        WindowRecord {
            window_id: window_id.to_string(),
            tabs: vec![Tab::new(TabType::ModelViewer, Some("42".into()))],
            active_tab_id: Some("modelViewer:42".into()),
            recently_closed: Vec::new(),
            last_touched_at: Utc::now(),
        }
    }

    #[test]
    fn test_load_missing_record() {
        let temp = tempdir().unwrap();
        let store = FileRegistryStore::new(temp.path());
        assert!(store.load("nope").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let store = FileRegistryStore::new(temp.path().join("windows"));

        let rec = record("w-1");
        store.save(&rec).unwrap();

        let loaded = store.load("w-1").unwrap().unwrap();
        assert_eq!(loaded.window_id, "w-1");
        assert_eq!(loaded.tabs, rec.tabs);
        assert_eq!(loaded.active_tab_id, rec.active_tab_id);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = tempdir().unwrap();
        let store = FileRegistryStore::new(temp.path());
        store.save(&record("w-1")).unwrap();
        store.remove("w-1").unwrap();
        store.remove("w-1").unwrap();
        assert!(store.load("w-1").unwrap().is_none());
    }

    #[test]
    fn test_list_skips_corrupt_records() {
        let temp = tempdir().unwrap();
        let store = FileRegistryStore::new(temp.path());
        store.save(&record("w-1")).unwrap();
        store.save(&record("w-2")).unwrap();
        fs::write(temp.path().join("w-3.yaml"), "windowId: [broken").unwrap();

        let mut ids: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.window_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["w-1", "w-2"]);
    }

    #[test]
    fn test_archive_moves_record_and_bounds_ring() {
        let temp = tempdir().unwrap();
        let store = FileRegistryStore::new(temp.path());

        for i in 0..7 {
            let id = format!("w-{i}");
            store.save(&record(&id)).unwrap();
            store.archive(&id).unwrap();
        }

        assert!(store.list().unwrap().is_empty());
        let archived = store.archived().unwrap();
        assert_eq!(archived.len(), ARCHIVED_WINDOWS_CAP);
        assert_eq!(archived[0].window_id, "w-6");
        assert_eq!(archived[4].window_id, "w-2");
    }

    #[test]
    fn test_archive_missing_is_noop() {
        let temp = tempdir().unwrap();
        let store = FileRegistryStore::new(temp.path());
        store.archive("ghost").unwrap();
        assert!(store.archived().unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_parity() {
        let store = MemoryRegistryStore::new();
        store.save(&record("w-1")).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
        store.archive("w-1").unwrap();
        assert!(store.load("w-1").unwrap().is_none());
        assert_eq!(store.archived().unwrap()[0].window_id, "w-1");
    }
}
