//! Live Feed Plugin for Bevy

use bevy::prelude::*;
use std::path::PathBuf;

use crate::feed::{FeedViewer, FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use crate::transport::{FeedConnection, transport_channel};
use crate::ui::systems::*;

/// Endpoint the viewer subscribes to unless configured otherwise.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080";

/// Bevy plugin for the live feed viewer.
///
/// This plugin:
/// - Loads the retain-count preference and initializes the viewer
/// - Opens the WebSocket connection to the configured endpoint
/// - Builds the widgets under any spawned [`LiveFeedBundle`]
/// - Drains transport events and user input each frame
///
/// ## Usage
///
/// ```ignore
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(LiveFeedPlugin::default())
///     .run();
/// ```
pub struct LiveFeedPlugin {
    endpoint: String,
    /// `None` keeps preferences in memory only
    preferences_path: Option<PathBuf>,
}

impl Default for LiveFeedPlugin {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            preferences_path: FilePreferenceStore::default_path(),
        }
    }
}

impl LiveFeedPlugin {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_path = Some(path.into());
        self
    }

    /// Keep preferences in memory; nothing survives a restart.
    pub fn with_memory_preferences(mut self) -> Self {
        self.preferences_path = None;
        self
    }

    fn open_store(&self) -> Box<dyn PreferenceStore> {
        let Some(ref path) = self.preferences_path else {
            log::info!("Using in-memory preferences");
            return Box::new(MemoryPreferenceStore::new());
        };

        match FilePreferenceStore::open(path) {
            Ok(store) => {
                log::info!("Using preferences at {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("{}; falling back to in-memory preferences", e);
                Box::new(MemoryPreferenceStore::new())
            }
        }
    }
}

impl Plugin for LiveFeedPlugin {
    fn build(&self, app: &mut App) {
        log::info!("Building live feed plugin...");

        let viewer = FeedViewer::new(self.open_store());
        app.insert_resource(LiveFeedState::initialized(viewer));

        let (handler, receiver) = transport_channel();
        let connection = FeedConnection::open(self.endpoint.clone(), handler);
        app.insert_resource(FeedEventReceiver(receiver))
            .insert_resource(FeedConnectionResource(connection));

        app.init_resource::<RetainInputFocus>().add_systems(
            Update,
            (
                build_feed_layout,
                process_transport_events,
                handle_pause_button,
                handle_retain_input_focus,
                handle_retain_input_keys,
                apply_surface_ops,
            )
                .chain(),
        );

        log::info!("Live feed plugin configured for {}", self.endpoint);
    }
}
