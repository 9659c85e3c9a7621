//! Window identity for independent execution contexts
//!
//! Each window (an independent execution context of the application) gets a
//! stable identifier: a reload of the same context reuses its id, a fresh
//! context mints a new one. The id lives in context-local storage that is
//! deliberately *not* shared between contexts.

use parking_lot::Mutex;
use std::path::PathBuf;

/// Identifier for a window execution context.
pub type WindowId = String;

/// Context-local, non-shared storage for the window id.
///
/// The browser analog is `sessionStorage`; native embeddings supply a slot
/// scoped to their own notion of a context.
pub trait ContextSlot: Send + Sync {
    /// Read the stored window id, if any.
    fn get(&self) -> Option<String>;
    /// Store the window id.
    fn set(&self, value: &str);
}

/// Return the context's window id, minting and storing a fresh one on first
/// call. Collisions are negligible at UUIDv4's 122 bits of entropy.
pub fn get_or_create_window_id(slot: &dyn ContextSlot) -> WindowId {
    if let Some(id) = slot.get() {
        log::debug!("Reusing window id {}", id);
        return id;
    }
    let id = uuid::Uuid::new_v4().to_string();
    slot.set(&id);
    log::info!("Assigned new window id {}", id);
    id
}

/// In-memory slot for tests and single-context embeddings.
#[derive(Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-seeded with an id, simulating a reloaded context.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(id.into())),
        }
    }
}

impl ContextSlot for MemorySlot {
    fn get(&self) -> Option<String> {
        self.value.lock().clone()
    }

    fn set(&self, value: &str) {
        *self.value.lock() = Some(value.to_string());
    }
}

/// File-backed slot for native contexts that survive process restarts.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContextSlot for FileSlot {
    fn get(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn set(&self, value: &str) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&self.path, value) {
            log::warn!("Failed to persist window id to {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_slot_mints_and_stores() {
        let slot = MemorySlot::new();
        let id = get_or_create_window_id(&slot);
        assert!(!id.is_empty());
        assert_eq!(slot.get(), Some(id.clone()));
        // Second call (a reload) reuses the stored id
        assert_eq!(get_or_create_window_id(&slot), id);
    }

    #[test]
    fn distinct_slots_get_distinct_ids() {
        let a = get_or_create_window_id(&MemorySlot::new());
        let b = get_or_create_window_id(&MemorySlot::new());
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_slot_is_reused() {
        let slot = MemorySlot::with_id("w-1");
        assert_eq!(get_or_create_window_id(&slot), "w-1");
    }

    #[test]
    fn file_slot_survives_reload() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ctx").join("window-id");

        let id = get_or_create_window_id(&FileSlot::new(&path));
        let again = get_or_create_window_id(&FileSlot::new(&path));
        assert_eq!(id, again);
    }
}
