//! Execution-context types and lifecycle event parsing.
//!
//! The endpoint announces script execution contexts (one per frame or
//! worker realm) through three unsolicited events. This module defines the
//! context data model and the typed parse of those events.
//!
//! # Event Methods
//!
//! | Method | Params |
//! |--------|--------|
//! | `Runtime.executionContextCreated` | `{ "context": { id, name, origin, auxData? } }` |
//! | `Runtime.executionContextDestroyed` | `{ "executionContextId": id }` |
//! | `Runtime.executionContextsCleared` | `{}` |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Constants
// ============================================================================

/// Event announcing a newly created execution context.
pub const CONTEXT_CREATED: &str = "Runtime.executionContextCreated";

/// Event announcing a destroyed execution context.
pub const CONTEXT_DESTROYED: &str = "Runtime.executionContextDestroyed";

/// Event announcing that all execution contexts were discarded.
pub const CONTEXTS_CLEARED: &str = "Runtime.executionContextsCleared";

// ============================================================================
// ExecutionContext
// ============================================================================

/// A script execution context exposed by the endpoint.
///
/// Tracked for informational and targeting purposes only; owned
/// exclusively by the connection that received the events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Context identifier, unique among live contexts on one connection.
    pub id: u64,

    /// Human-readable context name.
    #[serde(default)]
    pub name: String,

    /// Security origin of the context.
    #[serde(default)]
    pub origin: String,

    /// Auxiliary metadata.
    #[serde(
        default,
        rename = "auxData",
        skip_serializing_if = "Option::is_none"
    )]
    pub aux_data: Option<AuxData>,
}

/// Auxiliary context metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxData {
    /// Identifier of the frame the context belongs to.
    #[serde(
        default,
        rename = "frameId",
        skip_serializing_if = "Option::is_none"
    )]
    pub frame_id: Option<String>,

    /// Whether this is the frame's default context.
    #[serde(
        default,
        rename = "isDefault",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_default: Option<bool>,
}

// ============================================================================
// ContextEvent
// ============================================================================

/// A parsed context-lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEvent {
    /// A context came alive; append it to the live list.
    Created(ExecutionContext),

    /// The context with this id went away; no-op if unknown.
    Destroyed(u64),

    /// Every live context was discarded at once.
    Cleared,
}

impl ContextEvent {
    /// Parses an event frame into a typed variant.
    ///
    /// Returns `None` for methods outside the context lifecycle, and for
    /// lifecycle events whose params do not decode (dropped silently by
    /// the dispatcher).
    #[must_use]
    pub fn parse(method: &str, params: &Value) -> Option<Self> {
        match method {
            CONTEXT_CREATED => {
                let context = params.get("context")?;
                serde_json::from_value(context.clone()).ok().map(Self::Created)
            }
            CONTEXT_DESTROYED => params
                .get("executionContextId")
                .and_then(Value::as_u64)
                .map(Self::Destroyed),
            CONTEXTS_CLEARED => Some(Self::Cleared),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
