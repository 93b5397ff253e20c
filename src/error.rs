//! Error types for the CDP client.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use workbench_cdp::{Result, Connection};
//!
//! async fn example(connection: &Connection) -> Result<()> {
//!     let value = connection.call("Runtime.evaluate", params).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Discovery | [`Error::Discovery`], [`Error::TargetNotFound`] |
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`] |
//! | Call | [`Error::CallTimeout`], [`Error::Remote`] |
//! | External | [`Error::Json`], [`Error::WebSocket`], [`Error::Http`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::discovery::DiscoveryFailure;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Discovery Errors
    // ========================================================================
    /// No debuggable endpoint found on any configured port.
    ///
    /// Carries a per-port diagnostic for every port that was attempted.
    /// Fatal to the `initialize` invocation that triggered discovery, but
    /// the caller is free to retry discovery later.
    #[error("No workbench endpoint found: {0}")]
    Discovery(DiscoveryFailure),

    /// Target identifier not present in the published target list.
    ///
    /// Returned by `switch_target` when the id does not match any
    /// discovered target.
    #[error("Target not found: {target_id}")]
    TargetNotFound {
        /// The unknown target identifier.
        target_id: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket transport failed to open.
    ///
    /// Returned when the handshake errors before the channel is usable.
    /// Not retried at this layer.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// Transport closed or errored while calls were outstanding.
    ///
    /// Every still-pending call on the connection fails with this variant
    /// when the dispatcher terminates.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Call Errors
    // ========================================================================
    /// No response arrived within the call timeout window.
    ///
    /// Distinct from a remote-reported error; carries the method name and
    /// the elapsed duration.
    #[error("Call {method} timed out after {timeout_ms}ms")]
    CallTimeout {
        /// The method that timed out.
        method: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The endpoint explicitly returned an error payload for a call.
    ///
    /// The payload is passed through unmodified.
    #[error("Remote error: {0}")]
    Remote(Value),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a discovery error from per-port diagnostics.
    #[inline]
    pub fn discovery(failure: DiscoveryFailure) -> Self {
        Self::Discovery(failure)
    }

    /// Creates a target not found error.
    #[inline]
    pub fn target_not_found(target_id: impl Into<String>) -> Self {
        Self::TargetNotFound {
            target_id: target_id.into(),
        }
    }

    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a call timeout error.
    #[inline]
    pub fn call_timeout(method: impl Into<String>, elapsed: Duration) -> Self {
        Self::CallTimeout {
            method: method.into(),
            timeout_ms: elapsed.as_millis() as u64,
        }
    }

    /// Creates a remote error from the endpoint's error payload.
    #[inline]
    pub fn remote(payload: Value) -> Self {
        Self::Remote(payload)
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a call timeout.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::CallTimeout { .. })
    }

    /// Returns `true` if this is a connection-level error.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this is an error payload reported by the endpoint.
    #[inline]
    #[must_use]
    pub fn is_remote_error(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry: discovery can be re-run
    /// once an editor window opens, and a timed-out call can be reissued.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Discovery(_) | Self::CallTimeout { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_connection_error_display() {
        let err = Error::connection("handshake refused");
        assert_eq!(err.to_string(), "Connection failed: handshake refused");
    }

    #[test]
    fn test_call_timeout_display() {
        let err = Error::call_timeout("Runtime.evaluate", Duration::from_secs(30));
        assert_eq!(
            err.to_string(),
            "Call Runtime.evaluate timed out after 30000ms"
        );
    }

    #[test]
    fn test_remote_payload_passthrough() {
        let payload = json!({"code": -32000, "message": "boom"});
        let err = Error::remote(payload.clone());
        match err {
            Error::Remote(value) => assert_eq!(value, payload),
            _ => panic!("expected Remote variant"),
        }
    }

    #[test]
    fn test_target_not_found_display() {
        let err = Error::target_not_found("7800:abc");
        assert_eq!(err.to_string(), "Target not found: 7800:abc");
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::call_timeout("Runtime.enable", Duration::from_secs(1));
        let other_err = Error::connection("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        let conn_err = Error::connection("test");
        let closed_err = Error::ConnectionClosed;
        let other_err = Error::target_not_found("7800:x");

        assert!(conn_err.is_connection_error());
        assert!(closed_err.is_connection_error());
        assert!(!other_err.is_connection_error());
    }

    #[test]
    fn test_is_recoverable() {
        let timeout_err = Error::call_timeout("Runtime.evaluate", Duration::from_secs(30));
        let closed_err = Error::ConnectionClosed;

        assert!(timeout_err.is_recoverable());
        assert!(!closed_err.is_recoverable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
