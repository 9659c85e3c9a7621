//! Per-window navigation session
//!
//! [`NavSession`] is the authoritative navigation state for one window: it
//! hydrates (or seeds) the window's record from the shared registry,
//! exposes the mutation API read by all UI layers, mirrors every mutation
//! back to the registry, and applies cross-window move messages from the
//! bus.
//!
//! Mutations are synchronous and persistence completes before any broadcast
//! that describes the mutated state, so a remote window can never observe a
//! message about state that is not yet durable. Storage failures are logged
//! and swallowed: nothing in this API surfaces an error to the caller, the
//! worst case is a tab silently not appearing where expected.

use crate::bus::{BusMessage, BusReceiver, NavBus};
use crate::config::NavConfig;
use crate::deeplink::DeepLinkResolver;
use crate::registry::{RegistryStore, WindowRecord};
use crate::tab::{Tab, TabManager, TabType};
use crate::window::{get_or_create_window_id, ContextSlot, WindowId};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;

/// One window's navigation state and its wiring to the shared registry and
/// the cross-window bus.
pub struct NavSession {
    window_id: WindowId,
    manager: TabManager,
    registry: Arc<dyn RegistryStore>,
    bus: Arc<dyn NavBus>,
    rx: BusReceiver,
    config: NavConfig,
    resolver: DeepLinkResolver,
    deep_link_resolved: bool,
    last_touched_at: DateTime<Utc>,
    next_touch: Instant,
    next_gc: Instant,
}

impl NavSession {
    /// Attach a session for the current execution context, recovering the
    /// context's window id from its local slot.
    pub fn attach(
        registry: Arc<dyn RegistryStore>,
        bus: Arc<dyn NavBus>,
        config: NavConfig,
        slot: &dyn ContextSlot,
    ) -> Self {
        let window_id = get_or_create_window_id(slot);
        Self::with_window_id(registry, bus, config, window_id)
    }

    /// Attach a session for a known window id.
    ///
    /// Idempotent with respect to the registry: an existing record is
    /// resumed as-is, a missing one is created with the configured default
    /// tabs.
    pub fn with_window_id(
        registry: Arc<dyn RegistryStore>,
        bus: Arc<dyn NavBus>,
        config: NavConfig,
        window_id: WindowId,
    ) -> Self {
        // Subscribe before hydrating so no move lands between the two.
        let rx = bus.subscribe();

        let manager = match registry.load(&window_id) {
            Ok(Some(record)) => {
                log::info!(
                    "Resumed window {} ({} tabs)",
                    window_id,
                    record.tabs.len()
                );
                TabManager::from_parts(record.tabs, record.active_tab_id, record.recently_closed)
            }
            Ok(None) => Self::seed_default_tabs(&config),
            Err(e) => {
                log::warn!("Failed to load window record for {}: {}", window_id, e);
                Self::seed_default_tabs(&config)
            }
        };

        let now = Instant::now();
        let mut session = Self {
            window_id,
            manager,
            registry,
            bus,
            rx,
            next_touch: now + config.touch_interval(),
            next_gc: now + config.gc_interval(),
            config,
            resolver: DeepLinkResolver::new(),
            deep_link_resolved: false,
            last_touched_at: Utc::now(),
        };
        session.persist();
        session
    }

    fn seed_default_tabs(config: &NavConfig) -> TabManager {
        let mut manager = TabManager::new();
        for name in &config.default_tabs {
            match TabType::from_wire_name(name) {
                Some(kind) => {
                    manager.open(Tab::new(kind, None));
                }
                None => log::warn!("Skipping unknown default tab {:?}", name),
            }
        }
        if manager.tab_count() == 0 {
            manager.open(Tab::new(TabType::ModelList, None));
        }
        manager
    }

    /// Mirror the in-memory state to the shared registry.
    fn persist(&mut self) {
        let record = WindowRecord {
            window_id: self.window_id.clone(),
            tabs: self.manager.tabs().to_vec(),
            active_tab_id: self.manager.active_tab_id().map(String::from),
            recently_closed: self.manager.recently_closed().cloned().collect(),
            last_touched_at: self.last_touched_at,
        };
        if let Err(e) = self.registry.save(&record) {
            log::warn!("Failed to persist window {}: {}", self.window_id, e);
        }
    }

    /// Open a tab, focusing an existing one with the same derived id.
    ///
    /// `_panel_hint` is accepted for caller compatibility but does not
    /// partition storage; all tabs of a window live in one ordered list.
    /// Returns the id of the now-active tab.
    pub fn open_tab(&mut self, _panel_hint: Option<&str>, tab: Tab) -> String {
        let id = self.manager.open(tab);
        self.persist();
        id
    }

    /// Close a tab, archiving it for reopen. No-op on a missing id.
    pub fn close_tab(&mut self, tab_id: &str) {
        if self.manager.close(tab_id) {
            self.persist();
        }
    }

    /// Switch the active tab. No-op on a missing id.
    pub fn set_active_tab(&mut self, tab_id: &str) {
        self.manager.switch_to(tab_id);
        self.persist();
    }

    /// Merge an opaque value into a tab's UI sub-state so the tab's inner
    /// view survives a reload. No-op on a missing id.
    pub fn set_tab_ui_state(&mut self, tab_id: &str, key: &str, value: serde_json::Value) {
        self.manager.set_ui_state(tab_id, key, value);
        self.persist();
    }

    /// Reopen the most recently closed tab. Returns its id when one existed.
    pub fn reopen_closed_tab(&mut self) -> Option<String> {
        let tab = self.manager.pop_recently_closed()?;
        let id = self.manager.open(tab);
        self.persist();
        Some(id)
    }

    /// Reorder a tab within this window (drag-and-drop).
    pub fn move_tab_reorder(&mut self, tab_id: &str, target_index: usize) {
        if self.manager.move_to_index(tab_id, target_index) {
            self.persist();
        }
    }

    /// Add a tab arriving from another window and activate it.
    ///
    /// Transfer primitive: unlike [`open_tab`](Self::open_tab) an existing
    /// id makes this a full no-op, so redelivered moves are harmless.
    pub fn add_tab_to_window(&mut self, tab: Tab) {
        if self.manager.insert(tab) {
            self.persist();
        }
    }

    /// Remove a tab that is leaving for another window, without archiving.
    pub fn remove_tab_from_window(&mut self, tab_id: &str) -> Option<Tab> {
        let tab = self.manager.remove(tab_id)?;
        self.persist();
        Some(tab)
    }

    /// Move a tab from this window to another.
    ///
    /// The tab is removed and persisted locally first, then announced on
    /// the bus; the target window applies its side when the message
    /// arrives. With a degraded bus the move still takes effect here.
    /// No-op when the tab is missing or the target is this window.
    pub fn move_tab_to_window(&mut self, tab_id: &str, target_window_id: &str) {
        if target_window_id == self.window_id {
            return;
        }
        let Some(tab) = self.remove_tab_from_window(tab_id) else {
            return;
        };
        log::info!(
            "Moving tab {} from window {} to {}",
            tab.id,
            self.window_id,
            target_window_id
        );
        self.bus.publish(&BusMessage::TabMoved {
            source_window_id: self.window_id.clone(),
            target_window_id: target_window_id.to_string(),
            tab,
        });
    }

    /// Drain pending bus messages and apply them. Returns how many were
    /// processed. Call from the window's event loop.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Some(message) = self.rx.try_recv() {
            self.apply(message);
            processed += 1;
        }
        processed
    }

    fn apply(&mut self, message: BusMessage) {
        match message {
            BusMessage::TabMoved {
                source_window_id,
                target_window_id,
                tab,
            } => {
                if source_window_id == self.window_id {
                    // The tab has left; originators already removed it and
                    // redelivery finds nothing to remove.
                    if self.manager.remove(&tab.id).is_some() {
                        self.persist();
                    }
                } else if target_window_id == self.window_id {
                    self.add_tab_to_window(tab);
                } else {
                    log::trace!("Ignoring move of {} between other windows", tab.id);
                }
            }
            BusMessage::WindowClosed { window_id } => {
                // Registry cleanup stays lazy; this is a liveness signal.
                log::debug!("Window {} announced close", window_id);
            }
            BusMessage::StateSync => log::trace!("State sync nudge"),
        }
    }

    /// Refresh this window's liveness timestamp.
    pub fn touch_window(&mut self) {
        self.last_touched_at = Utc::now();
        self.persist();
    }

    /// Drive periodic maintenance: liveness touch and the stale-window
    /// sweep, each on its configured interval. Call from the window's event
    /// loop with `Instant::now()`.
    pub fn tick(&mut self, now: Instant) {
        if now >= self.next_touch {
            self.touch_window();
            self.next_touch = now + self.config.touch_interval();
        }
        if now >= self.next_gc {
            self.gc_stale_windows(Utc::now());
            self.next_gc = now + self.config.gc_interval();
        }
    }

    /// Remove every registry record untouched for longer than the stale
    /// threshold. Idempotent and commutative: concurrent sweeps from
    /// several windows converge on the same registry contents. Returns the
    /// number of records removed.
    pub fn gc_stale_windows(&self, now: DateTime<Utc>) -> usize {
        let threshold = chrono::Duration::from_std(self.config.stale_threshold())
            .unwrap_or(chrono::Duration::MAX);
        let records = match self.registry.list() {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Stale-window sweep could not list registry: {}", e);
                return 0;
            }
        };

        let mut removed = 0;
        for record in records {
            if now - record.last_touched_at > threshold {
                match self.registry.remove(&record.window_id) {
                    Ok(()) => {
                        log::info!(
                            "Collected stale window {} (last touched {})",
                            record.window_id,
                            record.last_touched_at.to_rfc3339()
                        );
                        removed += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to collect window {}: {}", record.window_id, e)
                    }
                }
            }
        }
        removed
    }

    /// Deregister this window on genuine close: archive its record into the
    /// bounded closed-windows ring and announce the close. Receivers take
    /// no direct action; the stale-window sweep remains the safety net for
    /// ungraceful terminations.
    pub fn close_window(&mut self) {
        self.persist();
        if let Err(e) = self.registry.archive(&self.window_id) {
            log::warn!("Failed to archive window {}: {}", self.window_id, e);
        }
        self.bus.publish(&BusMessage::WindowClosed {
            window_id: self.window_id.clone(),
        });
    }

    /// Nudge the other windows of the instance. Receivers treat this as a
    /// liveness/refresh signal; it carries no state.
    pub fn request_state_sync(&self) {
        self.bus.publish(&BusMessage::StateSync);
    }

    /// Resolve a startup location into at most one open-tab mutation and
    /// return the path the visible URL should be rewritten to.
    ///
    /// Runs once per window lifetime; later calls normalize only.
    pub fn resolve_deep_link(&mut self, location: &str) -> String {
        let resolution = self.resolver.resolve(location);
        if self.deep_link_resolved {
            return resolution.normalized;
        }
        self.deep_link_resolved = true;
        if let Some(tab) = resolution.tab {
            self.open_tab(None, tab);
        }
        resolution.normalized
    }

    /// This session's window id.
    pub fn window_id(&self) -> &str {
        &self.window_id
    }

    /// The window's tab state, for UI layers to render from.
    pub fn manager(&self) -> &TabManager {
        &self.manager
    }
}
