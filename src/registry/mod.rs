//! Persisted window registry
//!
//! The registry is the shared, persistent key-value store holding one
//! record per window id — the closest thing independent execution contexts
//! have to shared memory. Every window is a co-mutator: each window writes
//! only its own record directly, and cross-window effects travel over the
//! broadcast bus instead of direct writes to another window's record.

pub mod storage;

pub use storage::{FileRegistryStore, MemoryRegistryStore, ARCHIVED_WINDOWS_CAP};

use crate::tab::Tab;
use crate::window::WindowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One window's persisted navigation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    /// Owning window id.
    pub window_id: WindowId,
    /// Ordered tab list.
    pub tabs: Vec<Tab>,
    /// Active tab id; must reference an id in `tabs` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_tab_id: Option<String>,
    /// Recently closed tabs, most recent first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recently_closed: Vec<Tab>,
    /// Last liveness touch (RFC 3339). Drives stale-window collection.
    pub last_touched_at: DateTime<Utc>,
}

/// Errors from a registry store backend.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("registry record serialization error: {0}")]
    Serde(#[from] serde_yaml_ng::Error),
}

/// Shared key-value storage for window records.
///
/// Implementations must be safe to call from multiple windows concurrently;
/// the navigation protocol only requires per-record last-writer-wins.
pub trait RegistryStore: Send + Sync {
    /// Load one window's record.
    fn load(&self, window_id: &str) -> Result<Option<WindowRecord>, RegistryError>;

    /// Persist one window's record (last writer wins).
    fn save(&self, record: &WindowRecord) -> Result<(), RegistryError>;

    /// Remove one window's record. Removing an absent record is a no-op,
    /// which keeps concurrent GC sweeps commutative.
    fn remove(&self, window_id: &str) -> Result<(), RegistryError>;

    /// All live window records. Corrupt records are skipped, not fatal.
    fn list(&self) -> Result<Vec<WindowRecord>, RegistryError>;

    /// Move a live record into the bounded closed-windows ring.
    /// No-op when the record does not exist.
    fn archive(&self, window_id: &str) -> Result<(), RegistryError>;

    /// Archived records of genuinely closed windows, most recent first.
    fn archived(&self) -> Result<Vec<WindowRecord>, RegistryError>;
}
