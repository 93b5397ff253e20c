//! Connection coordinator and published state.
//!
//! Sequences discovery and connection bring-up, and publishes the result
//! as process-wide state for the relay layer to read. The published value
//! is replaced wholesale on every change - readers always observe a
//! complete snapshot, never a partial mutation.
//!
//! # Lifecycle
//!
//! ```text
//! initialize()        discover single target → connect → enable events
//!                     → publish as the active connection
//! refresh_targets()   discover all workbench windows → publish the list
//! switch_target(id)   connect to a listed target → on success swap the
//!                     active connection, returning the superseded one
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::discovery::{Scanner, Target};
use crate::error::{Error, Result};
use crate::options::ClientOptions;
use crate::transport::Connection;

// ============================================================================
// PublishedState
// ============================================================================

/// The process-wide view published for the relay layer.
///
/// Replaced as a whole on every coordinator operation; hold the `Arc`
/// returned by [`Coordinator::published`] to keep reading one consistent
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct PublishedState {
    /// The currently-active connection, if any.
    pub connection: Option<Connection>,

    /// The most recent multi-target discovery result.
    pub targets: Vec<Target>,

    /// Identifier of the currently-active target.
    pub active_target_id: Option<String>,
}

// ============================================================================
// Coordinator
// ============================================================================

/// Process-wide holder of the active connection and known targets.
///
/// Mediates the discover → connect → publish lifecycle. Operations are
/// expected to be invoked one at a time (single writer); reads are safe
/// at any point and see either the previous or the next snapshot, never
/// a mix.
pub struct Coordinator {
    /// Port scanner for both discovery modes.
    scanner: Scanner,

    /// Connection timing options.
    options: ClientOptions,

    /// Atomically-swapped published snapshot.
    published: RwLock<Arc<PublishedState>>,
}

// ============================================================================
// Coordinator - Constructor
// ============================================================================

impl Coordinator {
    /// Creates a coordinator with empty published state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the scanner's HTTP client cannot be
    /// constructed.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            scanner: Scanner::new(options.clone())?,
            options,
            published: RwLock::new(Arc::new(PublishedState::default())),
        })
    }
}

// ============================================================================
// Coordinator - Lifecycle
// ============================================================================

impl Coordinator {
    /// Discovers a single endpoint, connects, and publishes the result.
    ///
    /// On discovery failure nothing is published and the aggregated
    /// error propagates - a fatal startup condition for the caller, not
    /// retried here.
    ///
    /// # Errors
    ///
    /// - [`Error::Discovery`] if no port yields a matching endpoint
    /// - [`Error::Connection`] if the transport fails to open
    /// - Any failure of the context-enable call
    pub async fn initialize(&self) -> Result<Target> {
        info!("discovering debugging endpoint");
        let target = self.scanner.discover_single().await?;

        info!(port = target.port, target = %target.id, "connecting");
        let connection = Connection::connect_with_options(&target.ws_url, &self.options).await?;
        connection.initialize().await?;

        info!(contexts = connection.context_count(), "connection published");

        let previous = self.published();
        self.publish(PublishedState {
            connection: Some(connection),
            targets: previous.targets.clone(),
            active_target_id: Some(target.id.clone()),
        });

        Ok(target)
    }

    /// Runs multi-target discovery and publishes the resulting list.
    ///
    /// The list replaces any prior one unconditionally, even when empty.
    /// The active connection and target id carry over into the new
    /// snapshot.
    pub async fn refresh_targets(&self) -> Vec<Target> {
        let targets = self.scanner.discover_all().await;
        debug!(count = targets.len(), "publishing target list");

        let previous = self.published();
        self.publish(PublishedState {
            connection: previous.connection.clone(),
            targets: targets.clone(),
            active_target_id: previous.active_target_id.clone(),
        });

        targets
    }

    /// Connects to a target from the published list and makes it active.
    ///
    /// Published state is replaced only after the new connection's
    /// initialization completes; on any failure the previous
    /// connection and target remain published.
    ///
    /// Returns the superseded connection. This layer does not close it;
    /// it may still be serving in-flight work, so teardown belongs to
    /// the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::TargetNotFound`] if `target_id` is not in the list
    /// - [`Error::Connection`] if the transport fails to open
    /// - Any failure of the context-enable call
    pub async fn switch_target(&self, target_id: &str) -> Result<Option<Connection>> {
        let snapshot = self.published();
        let target = snapshot
            .targets
            .iter()
            .find(|t| t.id == target_id)
            .ok_or_else(|| Error::target_not_found(target_id))?;

        info!(target = %target.id, title = %target.title, "switching target");
        let connection = Connection::connect_with_options(&target.ws_url, &self.options).await?;
        connection.initialize().await?;

        let superseded = snapshot.connection.clone();
        self.publish(PublishedState {
            connection: Some(connection),
            targets: snapshot.targets.clone(),
            active_target_id: Some(target.id.clone()),
        });

        info!(target = %target_id, "active target switched");
        Ok(superseded)
    }
}

// ============================================================================
// Coordinator - Read Accessors
// ============================================================================

impl Coordinator {
    /// Returns the current published snapshot.
    #[inline]
    #[must_use]
    pub fn published(&self) -> Arc<PublishedState> {
        Arc::clone(&self.published.read())
    }

    /// Returns the currently-active connection, if any.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> Option<Connection> {
        self.published().connection.clone()
    }

    /// Returns the most recently published target list.
    #[inline]
    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        self.published().targets.clone()
    }

    /// Returns the identifier of the currently-active target.
    #[inline]
    #[must_use]
    pub fn active_target_id(&self) -> Option<String> {
        self.published().active_target_id.clone()
    }

    /// Swaps in a new snapshot.
    fn publish(&self, state: PublishedState) {
        *self.published.write() = Arc::new(state);
    }
}

// ============================================================================
// Tests
// ============================================================================
