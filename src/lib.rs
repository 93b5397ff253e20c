//! Workbench CDP - Target discovery and RPC connection management for
//! Chromium-based editors.
//!
//! This library connects to a locally running, Chromium-based editor over
//! its remote-debugging protocol: it discovers live debugging endpoints
//! (open editor windows), establishes a bidirectional RPC channel to each,
//! and exposes a call interface plus a live view of the target's script
//! execution contexts.
//!
//! # Architecture
//!
//! The crate follows a scan → connect → publish pipeline:
//!
//! - **Discovery**: probe a fixed set of local debug ports concurrently,
//!   classify what each reports, keep real workbench windows
//! - **Transport**: one WebSocket channel per endpoint with call/response
//!   correlation by id, per-call timeouts, and context-event tracking
//! - **Coordinator**: process-wide published snapshot of the active
//!   connection and known targets, swapped whole on every change
//!
//! The relay layer that forwards external requests through the call
//! interface is a separate concern and consumes this crate's published
//! state.
//!
//! # Quick Start
//!
//! ```no_run
//! use workbench_cdp::{ClientOptions, Coordinator, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Discover the editor and publish the active connection
//!     let coordinator = Coordinator::new(ClientOptions::new())?;
//!     let target = coordinator.initialize().await?;
//!     println!("connected to {} on port {}", target.title, target.port);
//!
//!     // Issue calls through the published connection
//!     let connection = coordinator.connection().expect("just published");
//!     let result = connection
//!         .call("Runtime.evaluate", serde_json::json!({"expression": "1 + 1"}))
//!         .await?;
//!     println!("result: {result}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`coordinator`] | Published state and lifecycle sequencing |
//! | [`discovery`] | Target model and debug-port scanner |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`options`] | Client configuration |
//! | [`protocol`] | Wire message types (internal shapes, public data) |
//! | [`transport`] | WebSocket RPC connection |

// ============================================================================
// Modules
// ============================================================================

/// Connection coordinator and published state.
///
/// [`Coordinator`] sequences discovery, connection bring-up, and target
/// switching, and publishes a consistent snapshot for readers.
pub mod coordinator;

/// Target discovery.
///
/// Port scanning, endpoint classification, and the [`Target`] model.
pub mod discovery;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Client configuration options.
///
/// Ports, title exclusions, and timeout windows.
pub mod options;

/// Wire protocol message types.
///
/// Frames exchanged with the endpoint and context-event parsing.
pub mod protocol;

/// WebSocket transport layer.
///
/// The RPC [`Connection`] and its execution-context tracker.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Coordinator types
pub use coordinator::{Coordinator, PublishedState};

// Discovery types
pub use discovery::{
    DiscoveryFailure, PortDiagnostic, ProbeError, Scanner, Target, TargetEntry, TargetKind,
};

// Error types
pub use error::{Error, Result};

// Options
pub use options::ClientOptions;

// Protocol types
pub use protocol::{AuxData, CallId, ContextEvent, ExecutionContext};

// Transport types
pub use transport::Connection;
