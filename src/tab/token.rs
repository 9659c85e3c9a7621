//! Compact tab-list serialization for URL-embedded state
//!
//! Encodes a tab list to a short `type[:resourceId]` comma-joined token
//! string, and decodes it back. Decoding skips unknown or malformed entries
//! individually so the format stays forward/backward compatible as tab
//! types evolve.

use super::{Tab, TabType};

/// Encode a tab list into a compact token string.
pub fn encode(tabs: &[Tab]) -> String {
    tabs.iter()
        .map(|tab| match (&tab.resource_id, tab.kind.is_resource_bound()) {
            (Some(rid), true) => format!("{}:{}", tab.kind.wire_name(), rid),
            _ => tab.kind.wire_name().to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode a token string into a tab list.
///
/// Unknown tab types, empty entries, and resource-bound entries that lack a
/// resource id are skipped with a warning; a stray resource id on a
/// non-resource type is ignored.
pub fn decode(token: &str) -> Vec<Tab> {
    token
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }

            let (name, rid) = match entry.split_once(':') {
                Some((name, rid)) => (name, Some(rid)),
                None => (entry, None),
            };

            let Some(kind) = TabType::from_wire_name(name) else {
                log::warn!("Skipping unknown tab token {:?}", entry);
                return None;
            };

            let resource_id = if kind.is_resource_bound() {
                match rid {
                    Some(rid) if !rid.is_empty() => Some(rid.to_string()),
                    _ => {
                        log::warn!("Skipping resource-bound tab token {:?} without an id", entry);
                        return None;
                    }
                }
            } else {
                None
            };
            Some(Tab::new(kind, resource_id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_mixed_list() {
        let tabs = vec![
            Tab::new(TabType::ModelList, None),
            Tab::new(TabType::ModelViewer, Some("42".into())),
            Tab::new(TabType::Settings, None),
        ];
        assert_eq!(encode(&tabs), "modelList,modelViewer:42,settings");
    }

    #[test]
    fn decode_roundtrip_preserves_ids_and_order() {
        let tabs = vec![
            Tab::new(TabType::ModelViewer, Some("42".into())),
            Tab::new(TabType::StageEditor, Some("s-1".into())),
            Tab::new(TabType::Packs, None),
        ];
        let decoded = decode(&encode(&tabs));
        assert_eq!(decoded, tabs);
    }

    #[test]
    fn decode_skips_unknown_and_empty_entries() {
        let decoded = decode("modelList,,bogusType:9, settings ,");
        let ids: Vec<&str> = decoded.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["modelList", "settings"]);
    }

    #[test]
    fn decode_ignores_stray_resource_id_on_singleton() {
        let decoded = decode("settings:9");
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].id, "settings");
        assert_eq!(decoded[0].resource_id, None);
    }

    #[test]
    fn decode_skips_resource_bound_entry_without_id() {
        assert!(decode("modelViewer:").is_empty());
        assert!(decode("modelViewer").is_empty());

        // A malformed entry does not take its neighbors down with it.
        let decoded = decode("textureSetViewer:,settings,stageEditor:s-1");
        let ids: Vec<&str> = decoded.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["settings", "stageEditor:s-1"]);
    }

    #[test]
    fn decode_empty_string_is_empty_list() {
        assert!(decode("").is_empty());
    }
}
