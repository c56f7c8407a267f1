use crate::transport::{CloseEvent, TransportError};

use super::error::{FeedError, PreferenceError};
use super::message::{FeedMessage, Timestamp};
use super::prefs::PreferenceStore;
use super::retain::{DEFAULT_RETAIN_COUNT, RETAIN_COUNT_KEY, parse_retain_count};
use super::view::FeedView;

/// Whether incoming messages are rendered or dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
}

impl PauseState {
    pub fn toggled(self) -> Self {
        match self {
            PauseState::Running => PauseState::Paused,
            PauseState::Paused => PauseState::Running,
        }
    }

    /// Label of the button that leaves this state.
    pub fn button_label(self) -> &'static str {
        match self {
            PauseState::Running => "Pause",
            PauseState::Paused => "Resume",
        }
    }
}

/// What happened to an incoming message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Rendered,
    /// Discarded because the viewer is paused
    Dropped,
}

/// Bridges transport events and user actions to a [`FeedView`].
///
/// Handlers run to completion one at a time; the viewer owns the pause flag
/// and the timestamp cursor, the view owns the display list.
pub struct FeedViewer {
    store: Box<dyn PreferenceStore>,
    pause: PauseState,
    last_timestamp: Option<Timestamp>,
}

impl FeedViewer {
    pub fn new(store: impl PreferenceStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            pause: PauseState::Running,
            last_timestamp: None,
        }
    }

    /// Populate the input from the stored preference and label the button.
    pub fn initialize(&mut self, view: &mut impl FeedView) {
        let stored = self.store.get(RETAIN_COUNT_KEY);
        let value = match stored {
            Some(value) if parse_retain_count(&value).is_some_and(|n| n > 0) => value,
            Some(value) => {
                log::warn!(
                    "[LiveFeed] Ignoring stored {} {:?}, using {}",
                    RETAIN_COUNT_KEY,
                    value,
                    DEFAULT_RETAIN_COUNT
                );
                DEFAULT_RETAIN_COUNT.to_string()
            }
            None => DEFAULT_RETAIN_COUNT.to_string(),
        };

        log::info!("[LiveFeed] Retaining {} entries", value);
        view.set_input_value(&value);
        view.set_button_label(self.pause.button_label());
    }

    /// Persist the retain-count input exactly as entered.
    ///
    /// Rendered entries are not re-trimmed until the next message.
    pub fn on_preference_change(&mut self, value: &str) -> Result<(), PreferenceError> {
        log::debug!("[LiveFeed] {} changed to {:?}", RETAIN_COUNT_KEY, value);
        self.store.set(RETAIN_COUNT_KEY, value)
    }

    /// Handle one text frame from the transport.
    ///
    /// While paused the frame is discarded before decoding. A decode failure
    /// loses the frame and leaves every piece of state untouched.
    pub fn on_message(
        &mut self,
        raw: &str,
        view: &mut impl FeedView,
    ) -> Result<Delivery, FeedError> {
        if self.pause == PauseState::Paused {
            log::debug!("[LiveFeed] Paused, dropping message");
            return Ok(Delivery::Dropped);
        }

        let mut message = FeedMessage::decode(raw)?;
        let timestamp = message.timestamp();
        if let Some(previous) = &self.last_timestamp {
            message.annotate_delta(previous);
        }
        self.last_timestamp = Some(timestamp);

        view.render(message.to_text());

        // Re-read on every message; a non-numeric value leaves the list unbounded
        match parse_retain_count(view.input_value()) {
            Some(max_count) => view.trim(max_count),
            None => log::debug!(
                "[LiveFeed] Retain count {:?} is not a number, not trimming",
                view.input_value()
            ),
        }

        Ok(Delivery::Rendered)
    }

    pub fn on_transport_open(&self) {
        log::info!("[LiveFeed] WebSocket connection opened");
    }

    pub fn on_transport_error(&self, error: &TransportError) {
        log::error!("[LiveFeed] WebSocket error: {}", error);
    }

    pub fn on_transport_close(&self, event: &CloseEvent) {
        log::info!("[LiveFeed] WebSocket connection closed: {}", event);
    }

    pub fn on_pause_toggle(&mut self, view: &mut impl FeedView) -> PauseState {
        self.pause = self.pause.toggled();
        view.set_button_label(self.pause.button_label());
        log::info!("[LiveFeed] {:?}", self.pause);
        self.pause
    }

    pub fn pause_state(&self) -> PauseState {
        self.pause
    }

    pub fn is_paused(&self) -> bool {
        self.pause == PauseState::Paused
    }

    /// Timestamp of the most recently rendered message.
    pub fn last_timestamp(&self) -> Option<&Timestamp> {
        self.last_timestamp.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedSurface, MemoryPreferenceStore, SurfaceOp};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn viewer_with(stored: Option<&str>) -> (FeedViewer, FeedSurface, MemoryPreferenceStore) {
        let mut store = MemoryPreferenceStore::new();
        if let Some(value) = stored {
            store.set(RETAIN_COUNT_KEY, value).unwrap();
        }
        let mut viewer = FeedViewer::new(store.clone());
        let mut surface = FeedSurface::new();
        viewer.initialize(&mut surface);
        (viewer, surface, store)
    }

    fn message(seq: u64, timestamp: i64) -> String {
        json!({ "seq": seq, "timestamp": timestamp }).to_string()
    }

    fn rendered(surface: &FeedSurface) -> Vec<Value> {
        surface
            .entries()
            .map(|e| serde_json::from_str(&e.text).unwrap())
            .collect()
    }

    #[test]
    fn initialize_defaults_to_five() {
        let (_, mut surface, _) = viewer_with(None);
        assert_eq!(surface.input_value(), "5");
        assert_eq!(surface.button_label(), "Pause");
        assert_eq!(
            surface.drain_ops(),
            vec![
                SurfaceOp::SetInputValue("5".to_string()),
                SurfaceOp::SetButtonLabel("Pause".to_string()),
            ]
        );
    }

    #[test]
    fn initialize_falls_back_on_unusable_preference() {
        for stored in ["", "abc", "0", "-3"] {
            let (_, surface, _) = viewer_with(Some(stored));
            assert_eq!(surface.input_value(), "5", "stored {:?}", stored);
        }
    }

    #[test]
    fn preference_change_persists_literal_and_reloads() {
        let (mut viewer, mut surface, store) = viewer_with(None);

        surface.edit_input("7");
        viewer.on_preference_change(surface.input_value()).unwrap();
        assert_eq!(store.get(RETAIN_COUNT_KEY), Some("7".to_string()));

        viewer.on_preference_change("lots").unwrap();
        assert_eq!(store.get(RETAIN_COUNT_KEY), Some("lots".to_string()));

        viewer.on_preference_change("7").unwrap();
        let mut reloaded = FeedViewer::new(store.clone());
        let mut reloaded_surface = FeedSurface::new();
        reloaded.initialize(&mut reloaded_surface);
        assert_eq!(reloaded_surface.input_value(), "7");
    }

    #[test]
    fn keeps_most_recent_three_of_five() {
        let (mut viewer, mut surface, _) = viewer_with(Some("3"));

        for seq in 1..=5 {
            let delivery = viewer
                .on_message(&message(seq, 1000 + seq as i64), &mut surface)
                .unwrap();
            assert_eq!(delivery, Delivery::Rendered);
        }

        let seqs: Vec<u64> = rendered(&surface)
            .iter()
            .map(|v| v["seq"].as_u64().unwrap())
            .collect();
        assert_eq!(seqs, vec![5, 4, 3]);
    }

    #[test]
    fn length_never_exceeds_retain_count_at_insertion() {
        let (mut viewer, mut surface, _) = viewer_with(Some("4"));
        let limits = ["4", "2", "6", "1", "3"];

        for (i, limit) in limits.iter().cycle().take(20).enumerate() {
            surface.edit_input(*limit);
            viewer
                .on_message(&message(i as u64, i as i64), &mut surface)
                .unwrap();
            assert!(surface.len() <= limit.parse::<usize>().unwrap());
        }
    }

    #[test]
    fn shrinking_retain_count_waits_for_next_message() {
        let (mut viewer, mut surface, _) = viewer_with(Some("5"));
        for seq in 0..5 {
            viewer.on_message(&message(seq, 0), &mut surface).unwrap();
        }

        surface.edit_input("2");
        viewer.on_preference_change("2").unwrap();
        assert_eq!(surface.len(), 5);

        viewer.on_message(&message(5, 0), &mut surface).unwrap();
        assert_eq!(surface.len(), 2);
    }

    #[test]
    fn non_numeric_retain_count_disables_trimming() {
        let (mut viewer, mut surface, _) = viewer_with(Some("2"));
        surface.edit_input("many");

        for seq in 0..6 {
            viewer.on_message(&message(seq, 0), &mut surface).unwrap();
        }
        assert_eq!(surface.len(), 6);
    }

    #[test]
    fn zero_retain_count_removes_new_entry_too() {
        let (mut viewer, mut surface, _) = viewer_with(None);
        surface.edit_input("0");

        viewer.on_message(&message(1, 0), &mut surface).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn deltatime_only_after_first_message() {
        let (mut viewer, mut surface, _) = viewer_with(Some("10"));

        viewer.on_message(&message(1, 1_000), &mut surface).unwrap();
        viewer.on_message(&message(2, 1_250), &mut surface).unwrap();
        viewer.on_message(&message(3, 1_200), &mut surface).unwrap();

        let values = rendered(&surface);
        assert_eq!(values[2].get("deltatime"), None);
        assert_eq!(values[1]["deltatime"], json!(250));
        assert_eq!(values[0]["deltatime"], json!(-50));
    }

    #[test]
    fn deltatime_with_iso_timestamps() {
        let (mut viewer, mut surface, _) = viewer_with(None);

        viewer
            .on_message(r#"{"timestamp":"2024-05-01T10:00:00.000Z"}"#, &mut surface)
            .unwrap();
        viewer
            .on_message(r#"{"timestamp":"2024-05-01T10:00:01.500Z"}"#, &mut surface)
            .unwrap();

        assert_eq!(rendered(&surface)[0]["deltatime"], json!(1500));
    }

    #[test]
    fn paused_messages_are_dropped_and_not_replayed() {
        let (mut viewer, mut surface, _) = viewer_with(None);
        viewer.on_message(&message(1, 100), &mut surface).unwrap();
        let cursor = viewer.last_timestamp().copied();

        viewer.on_pause_toggle(&mut surface);
        let delivery = viewer.on_message(&message(2, 200), &mut surface).unwrap();
        assert_eq!(delivery, Delivery::Dropped);
        assert_eq!(surface.len(), 1);
        assert_eq!(viewer.last_timestamp().copied(), cursor);

        viewer.on_pause_toggle(&mut surface);
        assert_eq!(surface.len(), 1);

        viewer.on_message(&message(3, 350), &mut surface).unwrap();
        let values = rendered(&surface);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["deltatime"], json!(250));
    }

    #[test]
    fn malformed_payload_while_paused_is_not_decoded() {
        let (mut viewer, mut surface, _) = viewer_with(None);
        viewer.on_pause_toggle(&mut surface);

        assert_eq!(
            viewer.on_message("{oops", &mut surface).unwrap(),
            Delivery::Dropped
        );
    }

    #[test]
    fn malformed_payload_changes_nothing() {
        let (mut viewer, mut surface, _) = viewer_with(None);
        viewer.on_message(&message(1, 100), &mut surface).unwrap();

        assert!(matches!(
            viewer.on_message("{oops", &mut surface),
            Err(FeedError::Decode(_))
        ));
        assert_eq!(surface.len(), 1);

        viewer.on_message(&message(2, 110), &mut surface).unwrap();
        assert_eq!(rendered(&surface)[0]["deltatime"], json!(10));
    }

    #[test]
    fn pause_button_label_alternates() {
        let (mut viewer, mut surface, _) = viewer_with(None);
        assert_eq!(surface.button_label(), "Pause");

        let expected = ["Resume", "Pause", "Resume", "Pause"];
        for label in expected {
            viewer.on_pause_toggle(&mut surface);
            assert_eq!(surface.button_label(), label);
        }
        assert_eq!(viewer.pause_state(), PauseState::Running);
    }

    #[test]
    fn transport_error_only_logs() {
        let (mut viewer, mut surface, store) = viewer_with(Some("3"));
        viewer.on_message(&message(1, 100), &mut surface).unwrap();
        surface.drain_ops();

        viewer.on_transport_error(&TransportError::Read("connection reset".to_string()));
        viewer.on_transport_close(&CloseEvent::abnormal("Connection error"));

        assert_eq!(surface.len(), 1);
        assert!(!surface.has_pending_ops());
        assert!(!viewer.is_paused());
        assert_eq!(store.get(RETAIN_COUNT_KEY), Some("3".to_string()));
    }
}
