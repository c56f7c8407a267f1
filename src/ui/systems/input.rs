use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::feed::FeedView;
use crate::ui::systems::render::input_display;
use crate::ui::systems::types::*;

/// Toggle pause when the pause button is clicked
pub fn handle_pause_button(
    query: Query<&Interaction, (Changed<Interaction>, With<PauseButton>)>,
    state: Option<ResMut<LiveFeedState>>,
) {
    let Some(mut state) = state else {
        return;
    };

    for interaction in &query {
        if *interaction == Interaction::Pressed {
            let LiveFeedState { viewer, surface } = &mut *state;
            viewer.on_pause_toggle(surface);
        }
    }
}

/// Focus the retain-count input on click, blur it on a click elsewhere
pub fn handle_retain_input_focus(
    mut commands: Commands,
    mouse: Res<ButtonInput<MouseButton>>,
    inputs: Query<&Interaction, With<RetainCountInput>>,
    mut focus: ResMut<RetainInputFocus>,
    state: Option<ResMut<LiveFeedState>>,
    widgets: Option<Res<FeedWidgets>>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let (Some(mut state), Some(widgets)) = (state, widgets) else {
        return;
    };

    let pressed_input = inputs.iter().any(|i| *i == Interaction::Pressed);

    if pressed_input && !focus.focused {
        focus.focused = true;
        focus.value_at_focus = state.surface.input_value().to_string();
        log::debug!("Retain input focused");
    } else if !pressed_input && focus.focused {
        commit_retain_input(&mut focus, &mut state);
        focus.focused = false;
        log::debug!("Retain input blurred");
    } else {
        return;
    }

    commands.entity(widgets.input_text).insert(Text::new(input_display(
        state.surface.input_value(),
        focus.focused,
    )));
}

/// Edit the focused retain-count input from keyboard input
///
/// Enter commits the value, Escape commits and blurs.
pub fn handle_retain_input_keys(
    mut commands: Commands,
    mut keyboard_events: MessageReader<KeyboardInput>,
    mut focus: ResMut<RetainInputFocus>,
    state: Option<ResMut<LiveFeedState>>,
    widgets: Option<Res<FeedWidgets>>,
) {
    let (Some(mut state), Some(widgets)) = (state, widgets) else {
        keyboard_events.clear();
        return;
    };

    if !focus.focused {
        keyboard_events.clear();
        return;
    }

    let mut value = state.surface.input_value().to_string();
    let mut dirty = false;

    for event in keyboard_events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }

        match &event.logical_key {
            Key::Character(chars) => {
                value.extend(chars.chars().filter(|c| !c.is_control()));
                dirty = true;
            }
            Key::Space => {
                value.push(' ');
                dirty = true;
            }
            Key::Backspace => {
                dirty |= value.pop().is_some();
            }
            Key::Enter => {
                state.surface.edit_input(value.clone());
                commit_retain_input(&mut focus, &mut state);
            }
            Key::Escape => {
                state.surface.edit_input(value.clone());
                commit_retain_input(&mut focus, &mut state);
                focus.focused = false;
                dirty = true;
                break;
            }
            _ => {}
        }
    }

    if dirty {
        log::debug!("Retain input edited: {:?}", value);
        state.surface.edit_input(value.clone());
        commands
            .entity(widgets.input_text)
            .insert(Text::new(input_display(&value, focus.focused)));
    }
}

/// Fire the change handler if the value differs from when focus was gained
fn commit_retain_input(focus: &mut RetainInputFocus, state: &mut LiveFeedState) {
    let value = state.surface.input_value().to_string();
    if value == focus.value_at_focus {
        return;
    }

    if let Err(e) = state.viewer.on_preference_change(&value) {
        log::error!("Failed to persist retain count {:?}: {}", value, e);
    }
    focus.value_at_focus = value;
}
