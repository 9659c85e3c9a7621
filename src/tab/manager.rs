//! Tab manager for coordinating the tabs within a single window

use super::Tab;
use std::collections::VecDeque;

/// Maximum number of entries kept in the recently-closed ring.
pub const RECENTLY_CLOSED_CAP: usize = 5;

/// Manages the ordered tab list of a single window.
///
/// All mutations are silent no-ops when they reference a tab id that is not
/// present; missing-target mutations arise naturally from races between
/// local and remote activity and are not actionable.
#[derive(Debug, Clone, Default)]
pub struct TabManager {
    /// All tabs in this window, in order
    tabs: Vec<Tab>,
    /// Currently active tab ID
    active_tab_id: Option<String>,
    /// Recently closed tabs, most recent first, deduplicated by id
    recently_closed: VecDeque<Tab>,
}

impl TabManager {
    /// Create a new empty tab manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a manager from persisted parts, repairing the active tab if
    /// the record references an id that is no longer present.
    pub fn from_parts(
        tabs: Vec<Tab>,
        active_tab_id: Option<String>,
        recently_closed: Vec<Tab>,
    ) -> Self {
        let active_tab_id = match active_tab_id {
            Some(id) if tabs.iter().any(|t| t.id == id) => Some(id),
            _ => tabs.last().map(|t| t.id.clone()),
        };
        let mut ring: VecDeque<Tab> = recently_closed.into_iter().collect();
        ring.truncate(RECENTLY_CLOSED_CAP);
        Self {
            tabs,
            active_tab_id,
            recently_closed: ring,
        }
    }

    /// Open a tab: if one with the same derived id already exists, activate
    /// it; otherwise append and activate. Returns the id of the tab that is
    /// now active.
    pub fn open(&mut self, tab: Tab) -> String {
        if self.tabs.iter().any(|t| t.id == tab.id) {
            let id = tab.id;
            log::debug!("Tab {} already open, focusing", id);
            self.active_tab_id = Some(id.clone());
            return id;
        }

        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_tab_id = Some(id.clone());
        log::info!("Opened tab {} (total: {})", id, self.tabs.len());
        id
    }

    /// Close a tab by id, archiving it into the recently-closed ring.
    ///
    /// If the closed tab was active, the new last tab becomes active, or no
    /// tab when the list is now empty. Returns `true` if a tab was removed.
    pub fn close(&mut self, id: &str) -> bool {
        let Some(idx) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };

        let tab = self.tabs.remove(idx);
        log::info!("Closed tab {} (remaining: {})", id, self.tabs.len());

        if self.active_tab_id.as_deref() == Some(id) {
            self.active_tab_id = self.tabs.last().map(|t| t.id.clone());
        }

        self.archive_closed(tab);
        true
    }

    /// Switch the active tab. No-op if `id` is not present.
    pub fn switch_to(&mut self, id: &str) {
        if self.tabs.iter().any(|t| t.id == id) {
            self.active_tab_id = Some(id.to_string());
            log::debug!("Switched to tab {}", id);
        }
    }

    /// Merge a value under `key` into a tab's opaque UI sub-state.
    /// No-op if the tab does not exist.
    pub fn set_ui_state(&mut self, id: &str, key: &str, value: serde_json::Value) {
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == id) {
            tab.ui_state.insert(key.to_string(), value);
        }
    }

    /// Insert a tab received from another window and make it active.
    ///
    /// Unlike [`open`](Self::open) this is a true transfer primitive: it
    /// skips entirely (including activation) when the id is already present,
    /// so redelivered move messages are no-ops. Returns `true` if inserted.
    pub fn insert(&mut self, tab: Tab) -> bool {
        if self.tabs.iter().any(|t| t.id == tab.id) {
            log::debug!("Tab {} already present, ignoring insert", tab.id);
            return false;
        }
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.active_tab_id = Some(id.clone());
        log::info!("Inserted tab {} (total: {})", id, self.tabs.len());
        true
    }

    /// Remove a tab without archiving it, returning it so the caller can
    /// hand it to another window. Active tab is repaired as on close.
    pub fn remove(&mut self, id: &str) -> Option<Tab> {
        let idx = self.tabs.iter().position(|t| t.id == id)?;
        let tab = self.tabs.remove(idx);
        log::info!("Removed tab {} (remaining: {})", id, self.tabs.len());

        if self.active_tab_id.as_deref() == Some(id) {
            self.active_tab_id = self.tabs.last().map(|t| t.id.clone());
        }
        Some(tab)
    }

    /// Move a tab to a specific index (drag-and-drop reordering).
    /// Returns true if the tab was actually moved.
    pub fn move_to_index(&mut self, id: &str, target_index: usize) -> bool {
        let Some(current_idx) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };

        let clamped = target_index.min(self.tabs.len().saturating_sub(1));
        if clamped == current_idx {
            return false;
        }

        let tab = self.tabs.remove(current_idx);
        self.tabs.insert(clamped, tab);
        log::debug!("Moved tab {} from index {} to {}", id, current_idx, clamped);
        true
    }

    /// Pop the most recently closed tab for reopening.
    pub fn pop_recently_closed(&mut self) -> Option<Tab> {
        self.recently_closed.pop_front()
    }

    fn archive_closed(&mut self, tab: Tab) {
        self.recently_closed.retain(|t| t.id != tab.id);
        self.recently_closed.push_front(tab);
        self.recently_closed.truncate(RECENTLY_CLOSED_CAP);
    }

    /// Get the active tab ID
    pub fn active_tab_id(&self) -> Option<&str> {
        self.active_tab_id.as_deref()
    }

    /// Get a reference to the active tab
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id
            .as_deref()
            .and_then(|id| self.tabs.iter().find(|t| t.id == id))
    }

    /// Get a tab by ID
    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Whether a tab with this id is present
    pub fn contains(&self, id: &str) -> bool {
        self.tabs.iter().any(|t| t.id == id)
    }

    /// Get all tabs as a slice
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Get the number of tabs
    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    /// Recently closed tabs, most recent first
    pub fn recently_closed(&self) -> impl Iterator<Item = &Tab> {
        self.recently_closed.iter()
    }
}
