use bevy::prelude::*;

use crate::feed::SurfaceOp;
use crate::ui::systems::types::*;

const PANEL_COLOR: Color = Color::srgb(0.12, 0.12, 0.14);
const INPUT_COLOR: Color = Color::srgb(0.2, 0.2, 0.24);
const BUTTON_COLOR: Color = Color::srgb(0.25, 0.35, 0.55);
const BORDER_COLOR: Color = Color::srgb(0.45, 0.45, 0.5);
const ENTRY_FONT_SIZE: f32 = 14.0;

/// Spawn the input, button and list under each new root
pub fn build_feed_layout(
    mut commands: Commands,
    roots: Query<Entity, (With<LiveFeedRoot>, With<LiveFeedDirtyFlag>)>,
    widgets: Option<Res<FeedWidgets>>,
) {
    for root in &roots {
        commands.entity(root).remove::<LiveFeedDirtyFlag>();

        if widgets.is_some() {
            log::warn!("Live feed layout already built, ignoring root {:?}", root);
            continue;
        }

        let controls = commands
            .spawn(Node {
                flex_direction: FlexDirection::Row,
                align_items: AlignItems::Center,
                column_gap: Val::Px(8.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            })
            .id();

        let label = commands.spawn(Text::new("Retain")).id();

        let input_text = commands.spawn(Text::new("")).id();
        let input = commands
            .spawn((
                Node {
                    min_width: Val::Px(64.0),
                    padding: UiRect::axes(Val::Px(6.0), Val::Px(2.0)),
                    border: UiRect::all(Val::Px(1.0)),
                    ..default()
                },
                Interaction::default(),
                BackgroundColor(INPUT_COLOR),
                BorderColor::all(BORDER_COLOR),
                RetainCountInput,
                Name::new("retain_count"),
            ))
            .add_child(input_text)
            .id();

        let button_text = commands.spawn(Text::new("")).id();
        let button = commands
            .spawn((
                Button,
                Node {
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                    ..default()
                },
                BackgroundColor(BUTTON_COLOR),
                PauseButton,
                Name::new("pause_button"),
            ))
            .add_child(button_text)
            .id();

        commands
            .entity(controls)
            .add_children(&[label, input, button]);

        let list = commands
            .spawn((
                Node {
                    flex_direction: FlexDirection::Column,
                    flex_grow: 1.0,
                    row_gap: Val::Px(4.0),
                    padding: UiRect::all(Val::Px(8.0)),
                    overflow: Overflow::clip(),
                    ..default()
                },
                BackgroundColor(PANEL_COLOR),
                DataList,
                Name::new("data_list"),
            ))
            .id();

        commands.entity(root).add_children(&[controls, list]);

        commands.insert_resource(FeedWidgets {
            input_text,
            button_text,
            list,
            entries: Default::default(),
        });

        log::info!("Built live feed layout: root={:?} list={:?}", root, list);
    }
}

/// Apply pending surface operations to the widget entities
pub fn apply_surface_ops(
    mut commands: Commands,
    state: Option<ResMut<LiveFeedState>>,
    widgets: Option<ResMut<FeedWidgets>>,
    focus: Option<Res<RetainInputFocus>>,
) {
    let (Some(mut state), Some(mut widgets)) = (state, widgets) else {
        return;
    };

    if !state.surface.has_pending_ops() {
        return;
    }

    let focused = focus.is_some_and(|f| f.focused);

    for op in state.surface.drain_ops() {
        match op {
            SurfaceOp::Prepend(entry) => {
                let entity = commands
                    .spawn((
                        Text::new(entry.text),
                        TextFont::from_font_size(ENTRY_FONT_SIZE),
                        FeedEntryNode { id: entry.id },
                    ))
                    .id();
                commands.entity(widgets.list).insert_children(0, &[entity]);
                widgets.entries.insert(entry.id, entity);
                log::debug!("Rendered entry: id={} entity={:?}", entry.id, entity);
            }

            SurfaceOp::Remove { id } => {
                if let Some(entity) = widgets.entries.remove(&id) {
                    commands.entity(entity).despawn();
                    log::debug!("Removed entry: id={} entity={:?}", id, entity);
                } else {
                    log::warn!("Failed to remove entry: id={} (not found)", id);
                }
            }

            SurfaceOp::SetInputValue(value) => {
                commands
                    .entity(widgets.input_text)
                    .insert(Text::new(input_display(&value, focused)));
            }

            SurfaceOp::SetButtonLabel(label) => {
                commands.entity(widgets.button_text).insert(Text::new(label));
            }
        }
    }
}

/// Text shown in the retain-count input, with a caret while focused
pub fn input_display(value: &str, focused: bool) -> String {
    if focused {
        format!("{}|", value)
    } else {
        value.to_string()
    }
}
