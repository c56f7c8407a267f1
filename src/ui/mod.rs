//! Bevy UI for the live feed viewer.
//!
//! Applies the viewer's [`FeedSurface`](crate::feed::FeedSurface) to Bevy UI
//! entities and turns clicks and key presses into viewer events.

pub mod plugin;

mod systems;

pub use plugin::LiveFeedPlugin;
pub use systems::*;
