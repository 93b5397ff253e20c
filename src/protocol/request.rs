//! Request and inbound frame types.
//!
//! Defines the JSON frames exchanged with the remote debugging endpoint.
//! The endpoint is not controlled by this crate, so the shapes here must
//! stay bit-compatible with what it sends and expects.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Constants
// ============================================================================

/// Method that enables context-lifecycle event delivery on the endpoint.
pub const RUNTIME_ENABLE: &str = "Runtime.enable";

// ============================================================================
// CallId
// ============================================================================

/// Request/response correlation identifier.
///
/// Strictly increasing per connection, never reused. Responses may arrive
/// out of issuance order; correlation is by id, not position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallId(u64);

impl CallId {
    /// Creates a call id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Request
// ============================================================================

/// An outbound RPC request frame.
///
/// # Format
///
/// ```json
/// { "id": 1, "method": "Runtime.evaluate", "params": { ... } }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Correlation id, unique for the connection's lifetime.
    pub id: CallId,

    /// Method name, `Domain.method` format.
    pub method: String,

    /// Method parameters.
    pub params: Value,
}

impl Request {
    /// Creates a new request frame.
    #[inline]
    #[must_use]
    pub fn new(id: CallId, method: impl Into<String>, params: Value) -> Self {
        Self {
            id,
            method: method.into(),
            params,
        }
    }
}

// ============================================================================
// InboundFrame
// ============================================================================

/// A loosely-typed inbound frame.
///
/// The protocol multiplexes correlated responses (`id` present) and
/// unsolicited events (`method` present, no `id`) over one channel. The
/// dispatcher checks both conditions independently rather than branching,
/// matching the wire protocol where neither excludes the other.
///
/// # Format
///
/// Response: `{ "id": 1, "result"?: any, "error"?: any }`
///
/// Event: `{ "method": "Runtime.executionContextCreated", "params": { ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    /// Correlation id, present on responses.
    #[serde(default)]
    pub id: Option<CallId>,

    /// Result payload, present on successful responses.
    #[serde(default)]
    pub result: Option<Value>,

    /// Error payload, present on failed responses.
    #[serde(default)]
    pub error: Option<Value>,

    /// Event method, present on unsolicited events.
    #[serde(default)]
    pub method: Option<String>,

    /// Event parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

impl InboundFrame {
    /// Parses a text frame, returning `None` for undecodable input.
    ///
    /// Malformed frames are dropped by the dispatcher, never fatal.
    #[inline]
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
