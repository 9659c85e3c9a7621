//! Startup deep-link resolution tests
//!
//! Exercises the full startup flow: window id recovery, state hydration,
//! one-shot deep-link resolution into an open-tab mutation, and URL
//! normalization.

use std::sync::Arc;

use modelibr_nav::{
    InProcessBus, MemoryRegistryStore, MemorySlot, NavBus, NavConfig, NavSession, RegistryStore,
    TabType,
};

fn fresh_session(registry: &Arc<MemoryRegistryStore>, slot: &MemorySlot) -> NavSession {
    NavSession::attach(
        Arc::clone(registry) as Arc<dyn RegistryStore>,
        Arc::new(InProcessBus::new()) as Arc<dyn NavBus>,
        NavConfig::default(),
        slot,
    )
}

#[test]
fn fresh_window_without_deep_link_shows_defaults() {
    let registry = Arc::new(MemoryRegistryStore::new());
    let mut session = fresh_session(&registry, &MemorySlot::new());

    assert_eq!(session.resolve_deep_link("/"), "/");
    assert_eq!(session.manager().tab_count(), 1);
    assert_eq!(session.manager().active_tab_id(), Some("modelList"));
}

#[test]
fn startup_with_model_path_opens_viewer_and_normalizes() {
    let registry = Arc::new(MemoryRegistryStore::new());
    let mut session = fresh_session(&registry, &MemorySlot::new());

    let normalized = session.resolve_deep_link("/view/model/42");
    assert_eq!(normalized, "/");

    let viewers: Vec<_> = session
        .manager()
        .tabs()
        .iter()
        .filter(|t| t.kind == TabType::ModelViewer)
        .collect();
    assert_eq!(viewers.len(), 1);
    assert_eq!(viewers[0].resource_id.as_deref(), Some("42"));
    assert_eq!(session.manager().active_tab_id(), Some("modelViewer:42"));
}

#[test]
fn deep_link_survives_reload_via_registry_not_url() {
    let registry = Arc::new(MemoryRegistryStore::new());
    let slot = MemorySlot::new();
    {
        let mut session = fresh_session(&registry, &slot);
        session.resolve_deep_link("/view/stage/s1");
    }

    // Reload: same context slot, clean URL
    let mut session = fresh_session(&registry, &slot);
    assert_eq!(session.resolve_deep_link("/"), "/");
    assert!(session.manager().contains("stageEditor:s1"));
    assert_eq!(session.manager().active_tab_id(), Some("stageEditor:s1"));
}

#[test]
fn legacy_query_token_is_stripped_without_opening_tabs() {
    let registry = Arc::new(MemoryRegistryStore::new());
    let mut session = fresh_session(&registry, &MemorySlot::new());

    let normalized = session.resolve_deep_link("/?tabs=modelViewer:5,settings");
    assert_eq!(normalized, "/");
    assert_eq!(session.manager().tab_count(), 1);
    assert!(!session.manager().contains("modelViewer:5"));
}
