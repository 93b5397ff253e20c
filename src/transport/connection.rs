//! WebSocket RPC connection and dispatcher.
//!
//! This module owns one WebSocket channel to one debugging endpoint:
//! call/response correlation, per-call timeouts, and routing of
//! unsolicited context-lifecycle events.
//!
//! # Dispatcher
//!
//! Each connection spawns a single tokio task that multiplexes:
//!
//! - Inbound frames from the endpoint (responses, events), processed
//!   strictly in arrival order
//! - Outbound requests from the call API
//! - Abandonment of timed-out correlation entries

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, timeout};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, trace};
use url::Url;

use crate::error::{Error, Result};
use crate::options::ClientOptions;
use crate::protocol::{CallId, ContextEvent, ExecutionContext, InboundFrame, RUNTIME_ENABLE, Request};

use super::contexts::ContextTracker;

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the split stream.
type WsSink = SplitSink<WsStream, Message>;

/// Map of call ids to response channels.
type PendingMap = FxHashMap<CallId, oneshot::Sender<Result<Value>>>;

// ============================================================================
// ConnectionCommand
// ============================================================================

/// Internal commands for the dispatcher.
enum ConnectionCommand {
    /// Send a request and route its response.
    Send {
        request: Request,
        response_tx: oneshot::Sender<Result<Value>>,
    },
    /// Remove a timed-out correlation entry.
    Abandon(CallId),
    /// Close the transport and stop the dispatcher.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// One live RPC channel to a debugging endpoint.
///
/// Owns the transport, the pending-call map, and the live execution
/// context list; no other component mutates them. Clones share the same
/// underlying channel.
///
/// # Thread Safety
///
/// `Connection` is `Send + Sync`; all operations are non-blocking.
#[derive(Clone)]
pub struct Connection {
    /// Channel for sending commands to the dispatcher.
    command_tx: mpsc::UnboundedSender<ConnectionCommand>,

    /// Pending-call map (shared with the dispatcher).
    pending: Arc<Mutex<PendingMap>>,

    /// Live context list (mutated only by the dispatcher).
    contexts: Arc<Mutex<ContextTracker>>,

    /// Next call id; strictly increasing, never reused.
    next_id: Arc<AtomicU64>,

    /// Per-call timeout window.
    call_timeout: Duration,

    /// Post-enable settle delay.
    settle_delay: Duration,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("pending", &self.pending_count())
            .field("contexts", &self.context_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Connection - Constructors
// ============================================================================

impl Connection {
    /// Opens a connection to a WebSocket debugger URL with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the URL is invalid or the
    /// transport errors before opening. There is no retry at this layer.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        Self::connect_with_options(ws_url, &ClientOptions::default()).await
    }

    /// Opens a connection using the given timing options.
    ///
    /// Resolves once the WebSocket handshake completes; the dispatcher
    /// task is running when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the URL is invalid or the
    /// transport errors before opening.
    pub async fn connect_with_options(ws_url: &str, options: &ClientOptions) -> Result<Self> {
        let url = Url::parse(ws_url)
            .map_err(|e| Error::connection(format!("invalid WebSocket URL {ws_url}: {e}")))?;

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::connection(e.to_string()))?;

        debug!(%url, "WebSocket connection established");

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let pending = Arc::new(Mutex::new(PendingMap::default()));
        let contexts = Arc::new(Mutex::new(ContextTracker::new()));

        tokio::spawn(Self::run_dispatcher(
            ws_stream,
            command_rx,
            Arc::clone(&pending),
            Arc::clone(&contexts),
        ));

        Ok(Self {
            command_tx,
            pending,
            contexts,
            next_id: Arc::new(AtomicU64::new(1)),
            call_timeout: options.call_timeout,
            settle_delay: options.settle_delay,
        })
    }
}

// ============================================================================
// Connection - Call API
// ============================================================================

impl Connection {
    /// Issues an RPC call and waits for the correlated response.
    ///
    /// # Errors
    ///
    /// - [`Error::Remote`] if the endpoint returns an error payload
    /// - [`Error::CallTimeout`] if no response arrives within the window
    /// - [`Error::ConnectionClosed`] if the transport drops mid-call
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.call_with_timeout(method, params, self.call_timeout)
            .await
    }

    /// Issues an RPC call with an explicit timeout window.
    ///
    /// The timeout races the response: whichever fires first neutralizes
    /// the other. A late response after timeout is ignored by the
    /// dispatcher (its correlation entry is already gone).
    ///
    /// # Errors
    ///
    /// Same as [`Connection::call`].
    pub async fn call_with_timeout(
        &self,
        method: &str,
        params: Value,
        call_timeout: Duration,
    ) -> Result<Value> {
        let id = CallId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let request = Request::new(id, method, params);

        let (response_tx, response_rx) = oneshot::channel();

        self.command_tx
            .send(ConnectionCommand::Send {
                request,
                response_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(call_timeout, response_rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                // Timeout won the race; drop the correlation entry so a
                // late response is ignored.
                let _ = self.command_tx.send(ConnectionCommand::Abandon(id));
                Err(Error::call_timeout(method, call_timeout))
            }
        }
    }

    /// Enables context-lifecycle events and waits for the settle delay.
    ///
    /// Context-created events may start arriving immediately after the
    /// enable call; the delay lets the initial batch land so the context
    /// list is populated before the connection is published.
    ///
    /// # Errors
    ///
    /// Propagates the enable call's failure.
    pub async fn initialize(&self) -> Result<()> {
        self.call(RUNTIME_ENABLE, json!({})).await?;
        sleep(self.settle_delay).await;

        debug!(contexts = self.context_count(), "connection initialized");
        Ok(())
    }
}

// ============================================================================
// Connection - Accessors
// ============================================================================

impl Connection {
    /// Returns a snapshot of the live execution contexts.
    ///
    /// Valid only while the connection is open.
    #[inline]
    #[must_use]
    pub fn contexts(&self) -> Vec<ExecutionContext> {
        self.contexts.lock().snapshot()
    }

    /// Returns the number of live execution contexts.
    #[inline]
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.lock().len()
    }

    /// Returns the number of outstanding calls.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Closes the transport and stops the dispatcher.
    ///
    /// Outstanding calls fail with [`Error::ConnectionClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ConnectionCommand::Shutdown);
    }
}

// ============================================================================
// Connection - Dispatcher
// ============================================================================

impl Connection {
    /// Single task owning the socket; processes inbound frames strictly
    /// in arrival order.
    async fn run_dispatcher(
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<ConnectionCommand>,
        pending: Arc<Mutex<PendingMap>>,
        contexts: Arc<Mutex<ContextTracker>>,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                // Inbound frames from the endpoint
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::dispatch_frame(&text, &pending, &contexts);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from the call API
                command = command_rx.recv() => {
                    match command {
                        Some(ConnectionCommand::Send { request, response_tx }) => {
                            Self::handle_send(request, response_tx, &mut ws_write, &pending).await;
                        }

                        Some(ConnectionCommand::Abandon(id)) => {
                            pending.lock().remove(&id);
                            debug!(%id, "abandoned timed-out call");
                        }

                        Some(ConnectionCommand::Shutdown) => {
                            debug!("shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        // The transport is gone; fail everything still pending rather
        // than leaving each call to its own timeout.
        Self::fail_pending_calls(&pending);

        debug!("dispatcher terminated");
    }

    /// Routes one inbound text frame.
    ///
    /// A frame carrying a known `id` resolves that pending call; a frame
    /// carrying a context-event `method` updates the tracker. The two
    /// conditions are checked independently - the protocol does not make
    /// them mutually exclusive. Undecodable frames are dropped.
    fn dispatch_frame(
        text: &str,
        pending: &Arc<Mutex<PendingMap>>,
        contexts: &Arc<Mutex<ContextTracker>>,
    ) {
        let Some(frame) = InboundFrame::parse(text) else {
            trace!("dropped malformed frame");
            return;
        };

        if let Some(id) = frame.id {
            if let Some(tx) = pending.lock().remove(&id) {
                let outcome = match frame.error {
                    Some(payload) => Err(Error::remote(payload)),
                    None => Ok(frame.result.unwrap_or(Value::Null)),
                };
                let _ = tx.send(outcome);
            } else {
                trace!(%id, "response for unknown call");
            }
        }

        if let Some(method) = frame.method.as_deref() {
            let params = frame.params.unwrap_or(Value::Null);
            if let Some(event) = ContextEvent::parse(method, &params) {
                contexts.lock().apply(event);
            }
        }
    }

    /// Serializes and sends one request, registering its correlation
    /// entry before the frame leaves.
    async fn handle_send(
        request: Request,
        response_tx: oneshot::Sender<Result<Value>>,
        ws_write: &mut WsSink,
        pending: &Arc<Mutex<PendingMap>>,
    ) {
        let id = request.id;

        let json = match serde_json::to_string(&request) {
            Ok(json) => json,
            Err(e) => {
                let _ = response_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        pending.lock().insert(id, response_tx);

        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            if let Some(tx) = pending.lock().remove(&id) {
                let _ = tx.send(Err(Error::connection(e.to_string())));
            }
            return;
        }

        trace!(%id, method = %request.method, "request sent");
    }

    /// Fails every still-pending call with `ConnectionClosed`.
    fn fail_pending_calls(pending: &Arc<Mutex<PendingMap>>) {
        let drained: Vec<_> = pending.lock().drain().collect();
        let count = drained.len();

        for (_, tx) in drained {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "failed pending calls on close");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
