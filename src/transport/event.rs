use std::fmt;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use thiserror::Error;

/// Close code used when the connection drops without a close frame.
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Errors reported through [`TransportHandler::on_error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("TCP connection failed: {0}")]
    Connect(String),
    #[error("Handshake failed: {0}")]
    Handshake(String),
    #[error("Read error: {0}")]
    Read(String),
}

/// Details of a closed connection (matching the browser `CloseEvent`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    pub code: u16,
    pub reason: String,
}

impl CloseEvent {
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// A close that happened without a close handshake.
    pub fn abnormal(reason: impl Into<String>) -> Self {
        Self::new(ABNORMAL_CLOSURE, reason)
    }

    pub fn was_clean(&self) -> bool {
        self.code != ABNORMAL_CLOSURE
    }
}

impl fmt::Display for CloseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reason.is_empty() {
            write!(f, "code {}", self.code)
        } else {
            write!(f, "code {} ({})", self.code, self.reason)
        }
    }
}

/// Callbacks invoked by a [`FeedConnection`](super::FeedConnection).
///
/// Implementations are moved onto the connection thread, so every callback
/// runs there. Use [`ChannelHandler`] to hand events back to another thread.
pub trait TransportHandler: Send + 'static {
    fn on_open(&mut self) {}

    /// A text frame was received.
    fn on_message(&mut self, data: String);

    fn on_error(&mut self, error: TransportError);

    fn on_close(&mut self, event: CloseEvent);
}

/// Events forwarded by [`ChannelHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Open,
    Message(String),
    Error(TransportError),
    Close(CloseEvent),
}

/// Handler that forwards every callback into an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelHandler {
    tx: Sender<TransportEvent>,
}

impl ChannelHandler {
    fn forward(&self, event: TransportEvent) {
        if let Err(e) = self.tx.send(event) {
            log::warn!("[WebSocket] Dropping event, receiver is gone: {:?}", e.0);
        }
    }
}

impl TransportHandler for ChannelHandler {
    fn on_open(&mut self) {
        self.forward(TransportEvent::Open);
    }

    fn on_message(&mut self, data: String) {
        self.forward(TransportEvent::Message(data));
    }

    fn on_error(&mut self, error: TransportError) {
        self.forward(TransportEvent::Error(error));
    }

    fn on_close(&mut self, event: CloseEvent) {
        self.forward(TransportEvent::Close(event));
    }
}

/// Receiving half of [`transport_channel`], safe to share between threads.
pub struct TransportEventReceiver {
    rx: Mutex<Receiver<TransportEvent>>,
}

impl TransportEventReceiver {
    /// Try to receive the next event without blocking
    pub fn try_recv(&self) -> Option<TransportEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Block until the next event arrives, every sender is dropped, or `timeout` passes.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TransportEvent> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

/// Create a [`ChannelHandler`] and its receiver.
///
/// The channel is unbounded: the connection never waits on the consumer.
pub fn transport_channel() -> (ChannelHandler, TransportEventReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        ChannelHandler { tx },
        TransportEventReceiver { rx: Mutex::new(rx) },
    )
}
