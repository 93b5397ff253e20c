//! Target model and endpoint classification.
//!
//! A target is one debuggable window of the editor, reachable via the
//! WebSocket URL its debug port reports. Classification separates real
//! workbench windows from the launcher and other internal pages.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// URL fragment identifying the primary workbench UI.
pub const WORKBENCH_URL_MARKER: &str = "workbench.html";

/// Title fragment identifying the primary workbench UI.
pub const WORKBENCH_TITLE_MARKER: &str = "workbench";

/// URL fragment identifying the fallback launcher UI.
pub const LAUNCHER_URL_MARKER: &str = "jetski";

/// Exact title of the fallback launcher UI.
pub const LAUNCHER_TITLE: &str = "Launchpad";

/// Title used when an endpoint reports none.
pub const UNTITLED: &str = "Untitled";

// ============================================================================
// TargetEntry
// ============================================================================

/// One raw element of a debug port's `/json/list` response.
///
/// Endpoints report fields inconsistently, so everything but `id` is
/// optional on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    /// Endpoint-assigned target identifier.
    #[serde(default)]
    pub id: String,

    /// Window title, if reported.
    #[serde(default)]
    pub title: Option<String>,

    /// Page URL, if reported.
    #[serde(default)]
    pub url: Option<String>,

    /// WebSocket debugger URL; absent for non-attachable targets.
    #[serde(default, rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: Option<String>,
}

// ============================================================================
// TargetEntry - Classification
// ============================================================================

impl TargetEntry {
    /// Returns `true` if the URL or title indicates the primary workbench UI.
    ///
    /// Single-target discovery's first-priority rule.
    #[must_use]
    pub fn matches_workbench_ui(&self) -> bool {
        self.url
            .as_deref()
            .is_some_and(|url| url.contains(WORKBENCH_URL_MARKER))
            || self
                .title
                .as_deref()
                .is_some_and(|title| title.contains(WORKBENCH_TITLE_MARKER))
    }

    /// Returns `true` if the URL or title indicates the fallback launcher UI.
    ///
    /// Single-target discovery's second-priority rule.
    #[must_use]
    pub fn matches_launcher_ui(&self) -> bool {
        self.url
            .as_deref()
            .is_some_and(|url| url.contains(LAUNCHER_URL_MARKER))
            || self.title.as_deref() == Some(LAUNCHER_TITLE)
    }

    /// Returns `true` if this is a real workbench window.
    ///
    /// Multi-target discovery keeps only these: the URL names the
    /// workbench UI and explicitly not the launcher.
    #[must_use]
    pub fn is_workbench_window(&self) -> bool {
        self.url.as_deref().is_some_and(|url| {
            url.contains(WORKBENCH_URL_MARKER) && !url.contains(LAUNCHER_URL_MARKER)
        })
    }
}

// ============================================================================
// TargetKind
// ============================================================================

/// Target classification retained by this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A real editor workbench window.
    Workbench,
}

// ============================================================================
// Target
// ============================================================================

/// One discoverable debugging endpoint.
///
/// Pure data; constructed only from an entry carrying a WebSocket URL.
/// The `id` is unique within a discovery pass: `<port>:<remote-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Unique identifier, `<port>:<remote-id>`.
    pub id: String,

    /// Local debug port the target was found on.
    pub port: u16,

    /// Window title, `"Untitled"` if the endpoint reported none.
    pub title: String,

    /// The endpoint's reported page URL.
    pub url: String,

    /// WebSocket URL used to open an RPC connection.
    #[serde(rename = "wsUrl")]
    pub ws_url: String,

    /// Target classification.
    #[serde(rename = "type")]
    pub kind: TargetKind,
}

impl Target {
    /// Builds a target from a raw entry found on `port`.
    ///
    /// Returns `None` if the entry lacks a WebSocket URL - such targets
    /// cannot be attached to and are never constructed.
    #[must_use]
    pub fn from_entry(port: u16, entry: &TargetEntry) -> Option<Self> {
        let ws_url = entry.web_socket_debugger_url.clone()?;

        Some(Self {
            id: format!("{port}:{}", entry.id),
            port,
            title: entry
                .title
                .clone()
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            url: entry.url.clone().unwrap_or_default(),
            ws_url,
            kind: TargetKind::Workbench,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: Option<&str>, url: Option<&str>, ws: Option<&str>) -> TargetEntry {
        TargetEntry {
            id: "abc123".to_string(),
            title: title.map(String::from),
            url: url.map(String::from),
            web_socket_debugger_url: ws.map(String::from),
        }
    }

    #[test]
    fn test_workbench_ui_by_url() {
        let e = entry(
            Some("project"),
            Some("vscode-file://vscode-app/workbench.html"),
            None,
        );
        assert!(e.matches_workbench_ui());
    }

    #[test]
    fn test_workbench_ui_by_title() {
        let e = entry(Some("workbench"), Some("about:blank"), None);
        assert!(e.matches_workbench_ui());
    }

    #[test]
    fn test_launcher_ui_by_url() {
        let e = entry(Some("start"), Some("app://host/jetski/index.html"), None);
        assert!(e.matches_launcher_ui());
        assert!(!e.matches_workbench_ui());
    }

    #[test]
    fn test_launcher_ui_by_exact_title() {
        assert!(entry(Some("Launchpad"), None, None).matches_launcher_ui());
        assert!(!entry(Some("launchpad"), None, None).matches_launcher_ui());
    }

    #[test]
    fn test_workbench_window_excludes_launcher_url() {
        let real = entry(None, Some("file:///workbench.html"), None);
        let launcher = entry(None, Some("file:///jetski/workbench.html"), None);
        assert!(real.is_workbench_window());
        assert!(!launcher.is_workbench_window());
    }

    #[test]
    fn test_from_entry_requires_ws_url() {
        let without = entry(Some("t"), Some("u"), None);
        assert!(Target::from_entry(7800, &without).is_none());

        let with = entry(Some("t"), Some("u"), Some("ws://127.0.0.1:7800/devtools/1"));
        assert!(Target::from_entry(7800, &with).is_some());
    }

    #[test]
    fn test_from_entry_id_format() {
        let e = entry(Some("t"), Some("u"), Some("ws://x"));
        let target = Target::from_entry(7801, &e).expect("target");
        assert_eq!(target.id, "7801:abc123");
        assert_eq!(target.port, 7801);
    }

    #[test]
    fn test_from_entry_untitled_fallback() {
        let missing = entry(None, Some("u"), Some("ws://x"));
        assert_eq!(Target::from_entry(7800, &missing).unwrap().title, "Untitled");

        let empty = entry(Some(""), Some("u"), Some("ws://x"));
        assert_eq!(Target::from_entry(7800, &empty).unwrap().title, "Untitled");
    }

    #[test]
    fn test_target_serialization_field_names() {
        let e = entry(Some("t"), Some("u"), Some("ws://x"));
        let target = Target::from_entry(7800, &e).expect("target");
        let value = serde_json::to_value(&target).expect("serialize");

        assert_eq!(value["wsUrl"], "ws://x");
        assert_eq!(value["type"], "workbench");
    }
}
