//! Deep-link resolution
//!
//! Runs exactly once per window lifetime, at startup: matches the incoming
//! URL path against an ordered route table, converts a match into an
//! open-tab mutation, and tells the caller to rewrite the visible URL to
//! the clean root path so the deep link does not linger in history.
//!
//! Legacy query parameters (including compact tab-list tokens) are
//! stripped during normalization without producing a tab mutation.

use crate::tab::{Tab, TabType};
use regex::Regex;

/// The root path every resolved location normalizes to.
pub const ROOT_PATH: &str = "/";

/// A single `{pattern, tab type}` rule. The first capture group is the
/// resource id.
struct Route {
    pattern: Regex,
    kind: TabType,
}

/// Outcome of resolving a startup location.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Tab to open, when a route matched.
    pub tab: Option<Tab>,
    /// Path the visible URL should be rewritten to.
    pub normalized: String,
}

/// Ordered deep-link route table; first match wins.
pub struct DeepLinkResolver {
    routes: Vec<Route>,
}

impl DeepLinkResolver {
    /// Resolver with the built-in `/view/<resourceKind>/<id>` routes.
    pub fn new() -> Self {
        let table = [
            ("model", TabType::ModelViewer),
            ("texture-set", TabType::TextureSetViewer),
            ("pack", TabType::PackViewer),
            ("project", TabType::ProjectViewer),
            ("stage", TabType::StageEditor),
        ];
        let routes = table
            .into_iter()
            .map(|(segment, kind)| Route {
                // Route segments are fixed literals, so these cannot fail
                pattern: Regex::new(&format!("^/view/{segment}/([^/]+)$"))
                    .expect("invalid built-in route pattern"),
                kind,
            })
            .collect();
        Self { routes }
    }

    /// Resolve a startup location (path plus optional query string).
    pub fn resolve(&self, location: &str) -> Resolution {
        let path = location.split('?').next().unwrap_or(location);

        for route in &self.routes {
            if let Some(captures) = route.pattern.captures(path) {
                let resource_id = captures[1].to_string();
                log::info!(
                    "Deep link {:?} resolved to {} ({})",
                    path,
                    route.kind.wire_name(),
                    resource_id
                );
                return Resolution {
                    tab: Some(Tab::new(route.kind, Some(resource_id))),
                    normalized: ROOT_PATH.to_string(),
                };
            }
        }

        Resolution {
            tab: None,
            normalized: ROOT_PATH.to_string(),
        }
    }
}

impl Default for DeepLinkResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_resource_kind() {
        let resolver = DeepLinkResolver::new();
        let cases = [
            ("/view/model/42", TabType::ModelViewer, "modelViewer:42"),
            (
                "/view/texture-set/7",
                TabType::TextureSetViewer,
                "textureSetViewer:7",
            ),
            ("/view/pack/p1", TabType::PackViewer, "packViewer:p1"),
            ("/view/project/x", TabType::ProjectViewer, "projectViewer:x"),
            ("/view/stage/s9", TabType::StageEditor, "stageEditor:s9"),
        ];
        for (path, kind, id) in cases {
            let resolution = resolver.resolve(path);
            let tab = resolution.tab.expect(path);
            assert_eq!(tab.kind, kind);
            assert_eq!(tab.id, id);
            assert_eq!(resolution.normalized, "/");
        }
    }

    #[test]
    fn unmatched_paths_normalize_without_mutation() {
        let resolver = DeepLinkResolver::new();
        for path in ["/", "/view/model", "/view/model/42/extra", "/settings"] {
            let resolution = resolver.resolve(path);
            assert_eq!(resolution.tab, None, "{path}");
            assert_eq!(resolution.normalized, "/");
        }
    }

    #[test]
    fn legacy_query_parameters_are_stripped_without_mutation() {
        let resolver = DeepLinkResolver::new();
        let resolution = resolver.resolve("/?tabs=modelList,modelViewer:5");
        assert_eq!(resolution.tab, None);
        assert_eq!(resolution.normalized, "/");
    }

    #[test]
    fn query_on_deep_link_does_not_break_the_match() {
        let resolver = DeepLinkResolver::new();
        let resolution = resolver.resolve("/view/model/42?tabs=settings");
        assert_eq!(resolution.tab.unwrap().id, "modelViewer:42");
    }

    #[test]
    fn uses_same_id_derivation_as_open_tab() {
        let resolver = DeepLinkResolver::new();
        let tab = resolver.resolve("/view/model/42").tab.unwrap();
        assert_eq!(tab.id, Tab::derive_id(TabType::ModelViewer, Some("42")));
    }
}
