use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::feed::{FeedSurface, FeedViewer};
use crate::transport::{FeedConnection, TransportEventReceiver};

/// Marker component for the live feed UI root container
#[derive(Component)]
pub struct LiveFeedRoot;

/// The retain-count text input (`retain_count`)
#[derive(Component)]
pub struct RetainCountInput;

/// The pause/resume button (`pause_button`)
#[derive(Component)]
pub struct PauseButton;

/// Container of rendered entries (`data_list`)
#[derive(Component)]
pub struct DataList;

/// A rendered message entry
#[derive(Component)]
pub struct FeedEntryNode {
    pub id: u64,
}

/// Set on a root whose child widgets have not been spawned yet
#[derive(Component)]
pub struct LiveFeedDirtyFlag;

#[derive(Bundle)]
pub struct LiveFeedBundle {
    root: LiveFeedRoot,
    root_node: Node,
}

impl LiveFeedBundle {
    pub fn new(root_node: Node) -> impl Bundle {
        (
            Self {
                root: LiveFeedRoot,
                root_node,
            },
            LiveFeedDirtyFlag,
        )
    }
}

/// Viewer state and the display surface it renders into
#[derive(Resource)]
pub struct LiveFeedState {
    pub viewer: FeedViewer,
    pub surface: FeedSurface,
}

impl LiveFeedState {
    /// Create the state and run the viewer's initialization against the surface.
    pub fn initialized(mut viewer: FeedViewer) -> Self {
        let mut surface = FeedSurface::new();
        viewer.initialize(&mut surface);
        Self { viewer, surface }
    }
}

/// Entities of the spawned widgets
#[derive(Resource)]
pub struct FeedWidgets {
    pub input_text: Entity,
    pub button_text: Entity,
    pub list: Entity,
    /// Mapping from entry ID to Bevy Entity
    pub entries: HashMap<u64, Entity>,
}

#[derive(Resource)]
pub struct FeedEventReceiver(pub TransportEventReceiver);

/// Keeps the connection handle alive for the app's lifetime
#[derive(Resource)]
pub struct FeedConnectionResource(pub FeedConnection);

/// Keyboard focus of the retain-count input
#[derive(Resource, Default)]
pub struct RetainInputFocus {
    pub focused: bool,
    /// Input value when focus was gained, to detect a change on commit
    pub value_at_focus: String,
}
