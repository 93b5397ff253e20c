//! WebSocket transport layer.
//!
//! This module owns the RPC channel to a debugging endpoint: connection
//! bring-up, call/response correlation, and the live execution-context
//! view maintained from lifecycle events.
//!
//! # Connection Lifecycle
//!
//! 1. `Connection::connect` - dial the endpoint's WebSocket URL
//! 2. `Connection::initialize` - enable context events, wait for the
//!    initial batch to settle
//! 3. `Connection::call` - issue correlated RPC calls
//! 4. `Connection::shutdown` - close the transport; outstanding calls
//!    fail rather than leak
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket RPC connection and dispatcher |
//! | `contexts` | Live execution-context tracking |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket RPC connection and dispatcher.
pub mod connection;

/// Live execution-context tracking.
pub mod contexts;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Connection;
pub use contexts::ContextTracker;
