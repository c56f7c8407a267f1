//! Receive-only WebSocket connection.
//!
//! Each connection runs on its own thread with a dedicated tokio runtime,
//! so it can be opened from a synchronous context such as a Bevy plugin.

use futures_util::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;

use super::event::{CloseEvent, TransportError, TransportHandler};

/// WebSocket ready states (matching browser API)
pub const WS_CONNECTING: u32 = 0;
pub const WS_OPEN: u32 = 1;
pub const WS_CLOSING: u32 = 2;
pub const WS_CLOSED: u32 = 3;

/// Handle to a live feed connection.
///
/// The connection is never closed from this side; it ends when the peer
/// closes it or the transport fails, and lives as long as the process otherwise.
pub struct FeedConnection {
    url: String,
    ready_state: Arc<AtomicU32>,
    _handle: JoinHandle<()>,
}

impl FeedConnection {
    /// Open a connection to `url` and deliver its events to `handler`.
    ///
    /// Returns immediately; connection failures are reported through
    /// [`TransportHandler::on_error`] followed by [`TransportHandler::on_close`].
    pub fn open(url: impl Into<String>, handler: impl TransportHandler) -> Self {
        let url = url.into();
        let ready_state = Arc::new(AtomicU32::new(WS_CONNECTING));

        let url_clone = url.clone();
        let ready_state_clone = ready_state.clone();

        let handle = thread::spawn(move || {
            let mut handler = handler;

            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("[WebSocket] Failed to create runtime: {}", e);
                    fail(
                        &mut handler,
                        &ready_state_clone,
                        TransportError::Connect(e.to_string()),
                        "Connection failed",
                    );
                    return;
                }
            };

            rt.block_on(run_connection(url_clone, handler, ready_state_clone));
        });

        Self {
            url,
            ready_state,
            _handle: handle,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current ready state, one of the `WS_*` constants.
    pub fn ready_state(&self) -> u32 {
        self.ready_state.load(Ordering::SeqCst)
    }
}

/// Mark the connection closed and report `error` plus an abnormal close.
fn fail(
    handler: &mut impl TransportHandler,
    ready_state: &AtomicU32,
    error: TransportError,
    reason: &str,
) {
    ready_state.store(WS_CLOSED, Ordering::SeqCst);
    handler.on_error(error);
    handler.on_close(CloseEvent::abnormal(reason));
}

async fn run_connection(
    url_str: String,
    mut handler: impl TransportHandler,
    ready_state: Arc<AtomicU32>,
) {
    log::info!("[WebSocket] Connecting to {}", url_str);

    // Parse URL to get host and port
    let url = match url::Url::parse(&url_str) {
        Ok(u) => u,
        Err(e) => {
            log::error!("[WebSocket] Invalid URL {}: {}", url_str, e);
            fail(
                &mut handler,
                &ready_state,
                TransportError::InvalidUrl(e.to_string()),
                "Invalid URL",
            );
            return;
        }
    };

    let host = url.host_str().unwrap_or("localhost");
    let port = url
        .port()
        .unwrap_or(if url.scheme() == "wss" { 443 } else { 80 });
    let addr = format!("{}:{}", host, port);

    log::info!("[WebSocket] Connecting TCP to {}", addr);

    let tcp_stream = match TcpStream::connect(&addr).await {
        Ok(stream) => {
            log::info!("[WebSocket] TCP connected");
            stream
        }
        Err(e) => {
            log::error!("[WebSocket] TCP connection failed: {}", e);
            fail(
                &mut handler,
                &ready_state,
                TransportError::Connect(e.to_string()),
                "Connection failed",
            );
            return;
        }
    };

    let request = match url_str.as_str().into_client_request() {
        Ok(req) => req,
        Err(e) => {
            log::error!("[WebSocket] Failed to create request: {}", e);
            fail(
                &mut handler,
                &ready_state,
                TransportError::InvalidUrl(e.to_string()),
                "Invalid request",
            );
            return;
        }
    };

    log::info!("[WebSocket] Performing WebSocket handshake");

    let mut ws_stream = match tokio_tungstenite::client_async(request, tcp_stream).await {
        Ok((stream, response)) => {
            log::info!(
                "[WebSocket] Connected successfully (status: {})",
                response.status()
            );
            stream
        }
        Err(e) => {
            log::error!("[WebSocket] Handshake failed: {}", e);
            fail(
                &mut handler,
                &ready_state,
                TransportError::Handshake(e.to_string()),
                "Handshake failed",
            );
            return;
        }
    };

    ready_state.store(WS_OPEN, Ordering::SeqCst);
    handler.on_open();

    while let Some(msg_result) = ws_stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                log::debug!(
                    "[WebSocket] Received: {}",
                    text.chars().take(100).collect::<String>()
                );
                handler.on_message(text.to_string());
            }
            Ok(Message::Binary(data)) => {
                log::debug!(
                    "[WebSocket] Ignoring binary frame ({} bytes)",
                    data.len()
                );
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // Handled by tungstenite
            }
            Ok(Message::Close(frame)) => {
                let (code, reason) = frame
                    .map(|f| (f.code.into(), f.reason.to_string()))
                    .unwrap_or((1000, String::new()));
                log::info!("[WebSocket] Received close: {} {}", code, reason);
                ready_state.store(WS_CLOSING, Ordering::SeqCst);

                // Keep reading until tungstenite has flushed the close reply
                while let Some(rest) = ws_stream.next().await {
                    if let Err(e) = rest {
                        log::debug!("[WebSocket] Error while closing: {}", e);
                        break;
                    }
                }

                ready_state.store(WS_CLOSED, Ordering::SeqCst);
                handler.on_close(CloseEvent::new(code, reason));
                return;
            }
            Ok(Message::Frame(_)) => {}
            Err(e) => {
                log::error!("[WebSocket] Read error: {}", e);
                fail(
                    &mut handler,
                    &ready_state,
                    TransportError::Read(e.to_string()),
                    "Connection error",
                );
                return;
            }
        }
    }

    // Stream ended without a close frame
    log::info!("[WebSocket] Connection ended");
    ready_state.store(WS_CLOSED, Ordering::SeqCst);
    handler.on_close(CloseEvent::abnormal("Connection ended"));
}
