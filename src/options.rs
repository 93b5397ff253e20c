//! Client configuration options.
//!
//! Provides a type-safe interface for configuring discovery and connection
//! behavior: the ports scanned for debugging endpoints, title exclusions,
//! and the timeout windows used by probes and RPC calls.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use workbench_cdp::ClientOptions;
//!
//! let options = ClientOptions::new()
//!     .with_ports(vec![9222])
//!     .with_call_timeout(Duration::from_secs(10));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Debug ports scanned by default.
pub const DEFAULT_PORTS: [u16; 4] = [7800, 7801, 7802, 7803];

/// Target titles excluded from multi-target discovery (internal pages).
pub const DEFAULT_EXCLUDED_TITLES: [&str; 2] = ["launchpad", "settings"];

/// Timeout for each `/json/list` probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for each RPC call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Delay after enabling context events, letting the initial
/// context-created notifications arrive before the connection is used.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// ClientOptions
// ============================================================================

/// Discovery and connection configuration.
///
/// Single source of truth for the ports, exclusions, and timing windows
/// used across the crate. [`Default`] matches a stock editor install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Debug ports to scan, in priority order.
    pub ports: Vec<u16>,

    /// Lowercased titles excluded from multi-target discovery.
    pub excluded_titles: Vec<String>,

    /// Timeout for each discovery HTTP probe.
    pub probe_timeout: Duration,

    /// Timeout for each RPC call.
    pub call_timeout: Duration,

    /// Settle delay after enabling context-lifecycle events.
    pub settle_delay: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientOptions {
    /// Creates options matching a stock editor install.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            excluded_titles: DEFAULT_EXCLUDED_TITLES
                .iter()
                .map(|title| title.to_string())
                .collect(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientOptions {
    /// Sets the ports to scan, replacing the defaults.
    ///
    /// Order matters: single-target discovery prefers earlier ports.
    #[inline]
    #[must_use]
    pub fn with_ports(mut self, ports: Vec<u16>) -> Self {
        self.ports = ports;
        self
    }

    /// Sets the excluded titles, replacing the defaults.
    ///
    /// Matching is case-insensitive and exact; entries are stored
    /// lowercased.
    #[inline]
    #[must_use]
    pub fn with_excluded_titles(mut self, titles: Vec<String>) -> Self {
        self.excluded_titles = titles.into_iter().map(|t| t.to_lowercase()).collect();
        self
    }

    /// Sets the per-probe HTTP timeout.
    #[inline]
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Sets the per-call RPC timeout.
    #[inline]
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Sets the post-enable settle delay.
    #[inline]
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

// ============================================================================
// Queries
// ============================================================================

impl ClientOptions {
    /// Returns `true` if the given title is excluded from discovery.
    ///
    /// Comparison is exact against the lowercased title.
    #[inline]
    #[must_use]
    pub fn is_title_excluded(&self, title: &str) -> bool {
        let lowered = title.to_lowercase();
        self.excluded_titles.iter().any(|ex| *ex == lowered)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.ports, vec![7800, 7801, 7802, 7803]);
        assert_eq!(options.excluded_titles, vec!["launchpad", "settings"]);
        assert_eq!(options.call_timeout, Duration::from_secs(30));
        assert_eq!(options.settle_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_with_ports() {
        let options = ClientOptions::new().with_ports(vec![9222, 9223]);
        assert_eq!(options.ports, vec![9222, 9223]);
    }

    #[test]
    fn test_excluded_titles_lowercased() {
        let options =
            ClientOptions::new().with_excluded_titles(vec!["Scratchpad".to_string()]);
        assert_eq!(options.excluded_titles, vec!["scratchpad"]);
    }

    #[test]
    fn test_title_exclusion_case_insensitive() {
        let options = ClientOptions::new();
        assert!(options.is_title_excluded("Launchpad"));
        assert!(options.is_title_excluded("SETTINGS"));
        assert!(!options.is_title_excluded("my project"));
    }

    #[test]
    fn test_title_exclusion_exact_match_only() {
        let options = ClientOptions::new();
        assert!(!options.is_title_excluded("launchpad — recent"));
    }

    #[test]
    fn test_builder_chain() {
        let options = ClientOptions::new()
            .with_call_timeout(Duration::from_secs(5))
            .with_probe_timeout(Duration::from_millis(500))
            .with_settle_delay(Duration::from_millis(50));
        assert_eq!(options.call_timeout, Duration::from_secs(5));
        assert_eq!(options.probe_timeout, Duration::from_millis(500));
        assert_eq!(options.settle_delay, Duration::from_millis(50));
    }
}
