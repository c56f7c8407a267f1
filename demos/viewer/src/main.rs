use bevy::prelude::*;
use bevy_live_feed::{LiveFeedBundle, LiveFeedPlugin};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(LiveFeedPlugin::default())
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);

    // Controls on top, the feed list filling the rest of the window
    commands.spawn(LiveFeedBundle::new(Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        flex_direction: FlexDirection::Column,
        ..default()
    }));
}
