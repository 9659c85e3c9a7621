//! Tab identity and per-window tab management
//!
//! This module provides the core tab infrastructure including:
//! - `TabType`: The kind of document a tab hosts
//! - `Tab`: A single navigation tab with its opaque UI sub-state
//! - `TabManager`: Coordinates the ordered tab list within one window

mod manager;
pub mod token;

pub use manager::{TabManager, RECENTLY_CLOSED_CAP};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of document a tab hosts.
///
/// Viewer/editor types are bound to a backend resource id; list types are
/// singletons within a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TabType {
    ModelViewer,
    TextureSetViewer,
    PackViewer,
    ProjectViewer,
    StageEditor,
    ModelList,
    TextureSets,
    Sprites,
    Sounds,
    Packs,
    Projects,
    StageList,
    History,
    RecycledFiles,
    Settings,
}

impl TabType {
    /// Stable wire name used in persisted records, serialized tokens, and
    /// deep links.
    pub fn wire_name(self) -> &'static str {
        match self {
            TabType::ModelViewer => "modelViewer",
            TabType::TextureSetViewer => "textureSetViewer",
            TabType::PackViewer => "packViewer",
            TabType::ProjectViewer => "projectViewer",
            TabType::StageEditor => "stageEditor",
            TabType::ModelList => "modelList",
            TabType::TextureSets => "textureSets",
            TabType::Sprites => "sprites",
            TabType::Sounds => "sounds",
            TabType::Packs => "packs",
            TabType::Projects => "projects",
            TabType::StageList => "stageList",
            TabType::History => "history",
            TabType::RecycledFiles => "recycledFiles",
            TabType::Settings => "settings",
        }
    }

    /// Parse a wire name back into a tab type.
    ///
    /// Returns `None` for unknown names so callers can skip them instead of
    /// failing a whole parse.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Some(match name {
            "modelViewer" => TabType::ModelViewer,
            "textureSetViewer" => TabType::TextureSetViewer,
            "packViewer" => TabType::PackViewer,
            "projectViewer" => TabType::ProjectViewer,
            "stageEditor" => TabType::StageEditor,
            "modelList" => TabType::ModelList,
            "textureSets" => TabType::TextureSets,
            "sprites" => TabType::Sprites,
            "sounds" => TabType::Sounds,
            "packs" => TabType::Packs,
            "projects" => TabType::Projects,
            "stageList" => TabType::StageList,
            "history" => TabType::History,
            "recycledFiles" => TabType::RecycledFiles,
            "settings" => TabType::Settings,
            _ => return None,
        })
    }

    /// Whether tabs of this type reference a backend resource id.
    pub fn is_resource_bound(self) -> bool {
        matches!(
            self,
            TabType::ModelViewer
                | TabType::TextureSetViewer
                | TabType::PackViewer
                | TabType::ProjectViewer
                | TabType::StageEditor
        )
    }
}

/// A single navigation tab within a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Identifier, unique within a window's tab list. Derived from
    /// `(kind, resource_id)` so re-opening a resource reuses the tab.
    pub id: String,
    /// What this tab hosts.
    pub kind: TabType,
    /// Display label, if the consumer set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Backend resource id for resource-bound tab types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Opaque per-tab UI sub-state, persisted but never interpreted here.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ui_state: BTreeMap<String, serde_json::Value>,
}

impl Tab {
    /// Create a tab with its id derived from `(kind, resource_id)`.
    pub fn new(kind: TabType, resource_id: Option<String>) -> Self {
        Self {
            id: Self::derive_id(kind, resource_id.as_deref()),
            kind,
            label: None,
            resource_id,
            ui_state: BTreeMap::new(),
        }
    }

    /// Attach a display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Deterministic tab id: `<wire>:<resource_id>` for resource-bound
    /// types, the wire name alone otherwise (singleton tabs deduplicate the
    /// same way resource tabs do).
    pub fn derive_id(kind: TabType, resource_id: Option<&str>) -> String {
        match resource_id {
            Some(rid) if kind.is_resource_bound() => format!("{}:{}", kind.wire_name(), rid),
            _ => kind.wire_name().to_string(),
        }
    }
}
