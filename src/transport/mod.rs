//! WebSocket Transport
//!
//! A receive-only WebSocket client built on tokio-tungstenite.
//! No Bevy dependencies - events are delivered to a [`TransportHandler`],
//! which can be driven by synthetic events in tests.

mod connection;
mod event;

pub use connection::{FeedConnection, WS_CLOSED, WS_CLOSING, WS_CONNECTING, WS_OPEN};
pub use event::{
    ChannelHandler, CloseEvent, TransportError, TransportEvent, TransportEventReceiver,
    TransportHandler, transport_channel,
};
