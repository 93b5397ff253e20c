//! Debug-port scanner.
//!
//! Probes a fixed, ordered list of local ports for the editor's debugging
//! HTTP endpoint (`/json/list`) and classifies what each port reports.
//! Probes are issued concurrently so one unreachable port never serializes
//! the scan; results are then examined in listed port order.
//!
//! # Discovery Modes
//!
//! - [`Scanner::discover_single`] - first endpoint matching the priority
//!   rules (workbench UI, then launcher UI, per port, ports in order).
//!   Fails with a per-port diagnostic when nothing matches anywhere.
//! - [`Scanner::discover_all`] - every real workbench window across all
//!   ports, minus excluded titles. Never fails; unreachable ports are
//!   skipped.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::result::Result as StdResult;

use futures_util::future;
use tracing::{debug, info, trace};

use crate::error::{Error, Result};
use crate::options::ClientOptions;

use super::target::{Target, TargetEntry};

// ============================================================================
// ProbeError
// ============================================================================

/// Why a single port yielded no target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The port did not respond at all (connection refused or timed out).
    Unreachable {
        /// Transport-level failure description.
        message: String,
    },

    /// The port responded with something other than a decodable target list.
    Malformed {
        /// Decode or status failure description.
        message: String,
    },

    /// The port responded, but no entry matched the discovery rules.
    NoMatch,
}

impl ProbeError {
    /// Creates an unreachable-port error.
    #[inline]
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Creates a malformed-response error.
    #[inline]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { message } => write!(f, "unreachable: {message}"),
            Self::Malformed { message } => write!(f, "malformed response: {message}"),
            Self::NoMatch => write!(f, "no matching target"),
        }
    }
}

// ============================================================================
// PortDiagnostic
// ============================================================================

/// Outcome of probing one port, kept for the aggregated discovery error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDiagnostic {
    /// The port that was probed.
    pub port: u16,

    /// Why it yielded no target.
    pub error: ProbeError,
}

impl fmt::Display for PortDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.port, self.error)
    }
}

// ============================================================================
// DiscoveryFailure
// ============================================================================

/// Aggregated diagnostics for a failed single-target discovery pass.
///
/// Enumerates every attempted port with the reason it was ruled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFailure {
    /// One diagnostic per attempted port, in scan order.
    pub attempts: Vec<PortDiagnostic>,
}

impl fmt::Display for DiscoveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.is_empty() {
            return write!(f, "no ports configured");
        }

        for (index, attempt) in self.attempts.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{attempt}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Scanner
// ============================================================================

/// Queries the configured debug ports for available endpoints.
///
/// Performs network reads only; publishing results is the coordinator's
/// job.
#[derive(Debug, Clone)]
pub struct Scanner {
    /// HTTP client with the probe timeout baked in.
    client: reqwest::Client,

    /// Ports, exclusions, timeouts.
    options: ClientOptions,
}

// ============================================================================
// Scanner - Constructor
// ============================================================================

impl Scanner {
    /// Creates a scanner for the given options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the HTTP client cannot be constructed.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.probe_timeout)
            .build()?;

        Ok(Self { client, options })
    }

    /// Returns the options the scanner was built with.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }
}

// ============================================================================
// Scanner - Discovery
// ============================================================================

impl Scanner {
    /// Finds the first endpoint matching the priority rules.
    ///
    /// Per port, in listed order: prefer an entry whose URL or title names
    /// the workbench UI, then one naming the launcher UI. The first match
    /// wins - a launcher on an earlier port beats a workbench on a later
    /// one. An entry without a WebSocket URL cannot be selected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] with one [`PortDiagnostic`] per
    /// attempted port when no port yields a match.
    pub async fn discover_single(&self) -> Result<Target> {
        let outcomes = self.probe_all().await;
        let mut attempts = Vec::with_capacity(outcomes.len());

        for (port, outcome) in outcomes {
            let entries = match outcome {
                Ok(entries) => entries,
                Err(error) => {
                    debug!(port, %error, "probe failed");
                    attempts.push(PortDiagnostic { port, error });
                    continue;
                }
            };

            if let Some(target) = entries
                .iter()
                .find(|entry| entry.matches_workbench_ui())
                .and_then(|entry| Target::from_entry(port, entry))
            {
                info!(port, title = %target.title, "found workbench target");
                return Ok(target);
            }

            if let Some(target) = entries
                .iter()
                .find(|entry| entry.matches_launcher_ui())
                .and_then(|entry| Target::from_entry(port, entry))
            {
                info!(port, title = %target.title, "found launcher target");
                return Ok(target);
            }

            attempts.push(PortDiagnostic {
                port,
                error: ProbeError::NoMatch,
            });
        }

        Err(Error::discovery(DiscoveryFailure { attempts }))
    }

    /// Collects every real workbench window across all ports.
    ///
    /// Keeps entries classified as workbench windows whose lowercased
    /// title is not excluded. Ports that error or time out are skipped;
    /// partial results from reachable ports are still returned. Never
    /// fails - an empty list means nothing was found.
    pub async fn discover_all(&self) -> Vec<Target> {
        let outcomes = self.probe_all().await;
        let mut targets = Vec::new();

        for (port, outcome) in outcomes {
            let entries = match outcome {
                Ok(entries) => entries,
                Err(error) => {
                    debug!(port, %error, "skipping port");
                    continue;
                }
            };

            for entry in &entries {
                if !entry.is_workbench_window() {
                    continue;
                }
                if self
                    .options
                    .is_title_excluded(entry.title.as_deref().unwrap_or(""))
                {
                    continue;
                }
                if let Some(target) = Target::from_entry(port, entry) {
                    targets.push(target);
                }
            }
        }

        debug!(count = targets.len(), "multi-target discovery complete");
        targets
    }
}

// ============================================================================
// Scanner - Probing
// ============================================================================

impl Scanner {
    /// Probes every configured port concurrently.
    ///
    /// Returned outcomes preserve the configured port order, so callers
    /// can apply ordered selection over an unordered scan.
    async fn probe_all(&self) -> Vec<(u16, StdResult<Vec<TargetEntry>, ProbeError>)> {
        let probes = self
            .options
            .ports
            .iter()
            .map(|&port| async move { (port, self.probe(port).await) });

        future::join_all(probes).await
    }

    /// Fetches one port's target list.
    async fn probe(&self, port: u16) -> StdResult<Vec<TargetEntry>, ProbeError> {
        let url = format!("http://127.0.0.1:{port}/json/list");
        trace!(port, "probing debug port");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProbeError::unreachable(e.to_string()))?
            .error_for_status()
            .map_err(|e| ProbeError::malformed(e.to_string()))?;

        response
            .json::<Vec<TargetEntry>>()
            .await
            .map_err(|e| ProbeError::malformed(e.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
