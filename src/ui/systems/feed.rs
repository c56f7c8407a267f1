use bevy::prelude::*;

use crate::transport::TransportEvent;
use crate::ui::systems::types::*;

/// Drain transport events and hand each one to the viewer
pub fn process_transport_events(
    receiver: Option<Res<FeedEventReceiver>>,
    state: Option<ResMut<LiveFeedState>>,
) {
    let (Some(receiver), Some(mut state)) = (receiver, state) else {
        return;
    };
    let LiveFeedState { viewer, surface } = &mut *state;

    while let Some(event) = receiver.0.try_recv() {
        match event {
            TransportEvent::Open => viewer.on_transport_open(),
            TransportEvent::Message(raw) => {
                // The message is lost; nothing else changes
                if let Err(e) = viewer.on_message(&raw, surface) {
                    log::error!("[LiveFeed] Failed to handle message: {}", e);
                }
            }
            TransportEvent::Error(error) => viewer.on_transport_error(&error),
            TransportEvent::Close(event) => viewer.on_transport_close(&event),
        }
    }
}
