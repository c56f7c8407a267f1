//! # Live Feed Viewer for Bevy
//!
//! Subscribes to a WebSocket feed of JSON messages and renders them as a
//! capped, most-recent-first list in Bevy UI. Rendering can be paused, and the
//! number of retained entries is a persisted preference.
//!
//! The [`feed`] and [`transport`] modules have no Bevy dependencies and can be
//! driven headless; [`ui`] adapts them to the ECS.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_live_feed::{LiveFeedBundle, LiveFeedPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(LiveFeedPlugin::default().with_endpoint("ws://localhost:8080"))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     commands.spawn(Camera2d);
//!     commands.spawn(LiveFeedBundle::new(Node {
//!         width: Val::Percent(100.0),
//!         height: Val::Percent(100.0),
//!         flex_direction: FlexDirection::Column,
//!         ..default()
//!     }));
//! }
//! ```

pub mod feed;
pub mod transport;
pub mod ui;

pub use ui::{LiveFeedBundle, LiveFeedPlugin};
