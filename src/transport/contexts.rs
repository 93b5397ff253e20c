//! Live execution-context tracking.
//!
//! Mirrors the endpoint's set of live script execution contexts from the
//! lifecycle events delivered after `Runtime.enable`. Each tracker is
//! owned by exactly one connection and mutated only by its dispatcher.

// ============================================================================
// Imports
// ============================================================================

use tracing::trace;

use crate::protocol::{ContextEvent, ExecutionContext};

// ============================================================================
// ContextTracker
// ============================================================================

/// The live execution-context list for one connection.
#[derive(Debug, Default)]
pub struct ContextTracker {
    /// Currently-live contexts, in creation order.
    contexts: Vec<ExecutionContext>,
}

impl ContextTracker {
    /// Creates an empty tracker.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one lifecycle event.
    pub fn apply(&mut self, event: ContextEvent) {
        match event {
            ContextEvent::Created(context) => {
                trace!(id = context.id, name = %context.name, "context created");
                self.contexts.push(context);
            }
            ContextEvent::Destroyed(id) => {
                // No-op if the id is unknown (already destroyed or from a
                // prior enable cycle).
                if let Some(index) = self.contexts.iter().position(|c| c.id == id) {
                    trace!(id, "context destroyed");
                    self.contexts.remove(index);
                }
            }
            ContextEvent::Cleared => {
                trace!(count = self.contexts.len(), "contexts cleared");
                self.contexts.clear();
            }
        }
    }

    /// Returns a snapshot of the live contexts.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Vec<ExecutionContext> {
        self.contexts.clone()
    }

    /// Returns the number of live contexts.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns `true` if no contexts are live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
