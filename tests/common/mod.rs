//! Shared test doubles.
//!
//! A minimal debug-port HTTP server serving a canned `/json/list` payload,
//! and a scripted WebSocket endpoint speaking the debugger wire format.

#![allow(dead_code)]

use std::future::Future;
use std::sync::{Arc, Once};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

/// Server-side WebSocket stream.
pub type ServerWs = WebSocketStream<TcpStream>;

static TRACING: Once = Once::new();

/// Installs a tracing subscriber once, honoring `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Binds and immediately releases an ephemeral port.
///
/// Nothing listens on the returned port afterwards, so connecting to it
/// is refused.
pub async fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    port
}

/// Serves a fixed raw HTTP response to every request on an ephemeral port.
///
/// Aborting the returned handle stops the server and frees the port.
pub async fn spawn_http(response: String) -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let response = response.clone();
            tokio::spawn(async move {
                // Drain the request head before answering.
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            request.extend_from_slice(&buf[..n]);
                            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    (port, handle)
}

/// Serves `body` as the `/json/list` payload on an ephemeral port.
pub async fn spawn_json_list(body: Value) -> (u16, JoinHandle<()>) {
    let payload = body.to_string();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    spawn_http(response).await
}

/// Runs `handler` for every WebSocket connection accepted on an
/// ephemeral port.
pub async fn spawn_ws_server<F, Fut>(handler: F) -> (u16, JoinHandle<()>)
where
    F: Fn(ServerWs) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let handler = Arc::new(handler);

    let handle = tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                if let Ok(ws) = tokio_tungstenite::accept_async(stream).await {
                    handler(ws).await;
                }
            });
        }
    });

    (port, handle)
}

/// Scripted endpoint: acks every call with `{"method": <method>}` and
/// emits the given context-created events right after the enable call.
pub async fn run_workbench_endpoint(ws: ServerWs, contexts_on_enable: Vec<Value>) {
    let (mut write, mut read) = ws.split();

    while let Some(Ok(message)) = read.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let frame: Value = serde_json::from_str(text.as_str()).expect("request json");
        let id = frame["id"].as_u64().expect("request id");
        let method = frame["method"].as_str().unwrap_or_default().to_string();

        let ack = json!({"id": id, "result": {"method": method}});
        if write
            .send(Message::Text(ack.to_string().into()))
            .await
            .is_err()
        {
            break;
        }

        if method == "Runtime.enable" {
            for context in &contexts_on_enable {
                let event = json!({
                    "method": "Runtime.executionContextCreated",
                    "params": {"context": context}
                });
                if write
                    .send(Message::Text(event.to_string().into()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }
    }
}

/// A `/json/list` entry for a real workbench window.
pub fn workbench_entry(id: &str, title: &str, ws_url: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "url": "vscode-file://vscode-app/out/vs/code/electron-browser/workbench/workbench.html",
        "webSocketDebuggerUrl": ws_url
    })
}

/// A `/json/list` entry for the fallback launcher window.
pub fn launcher_entry(id: &str, ws_url: &str) -> Value {
    json!({
        "id": id,
        "title": "Launchpad",
        "url": "app://local/jetski/index.html",
        "webSocketDebuggerUrl": ws_url
    })
}

/// The WebSocket debugger URL for a mock endpoint port.
pub fn ws_url(port: u16) -> String {
    format!("ws://127.0.0.1:{port}/devtools/page/{port}")
}
