use std::collections::VecDeque;

/// UI capability the viewer renders through.
///
/// Implemented by [`FeedSurface`]; the Bevy adapter applies the surface's
/// recorded operations to entities.
pub trait FeedView {
    /// Prepend an entry to the display list.
    fn render(&mut self, entry: String);

    /// Remove oldest entries until at most `max_count` remain.
    fn trim(&mut self, max_count: usize);

    /// Current text of the retain-count input.
    fn input_value(&self) -> &str;

    fn set_input_value(&mut self, value: &str);

    fn set_button_label(&mut self, label: &str);
}

/// A rendered entry of the display list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: u64,
    pub text: String,
}

/// Change recorded by [`FeedSurface`] for the UI adapter to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceOp {
    /// Insert an entry at the front of the list
    Prepend(FeedEntry),
    /// Remove an entry from the list
    Remove { id: u64 },
    SetInputValue(String),
    SetButtonLabel(String),
}

/// In-memory display state: the bounded list, input text and button label.
#[derive(Debug, Default)]
pub struct FeedSurface {
    entries: VecDeque<FeedEntry>,
    input_value: String,
    button_label: String,
    next_id: u64,
    pending: Vec<SurfaceOp>,
}

impl FeedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.iter()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn button_label(&self) -> &str {
        &self.button_label
    }

    /// Edit the input text as the user types, without recording an op.
    ///
    /// The widget already shows what the user typed.
    pub fn edit_input(&mut self, value: impl Into<String>) {
        self.input_value = value.into();
    }

    /// Take every operation recorded since the last drain.
    pub fn drain_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_ops(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Cancel a still-pending prepend, or record a removal if it was applied.
    ///
    /// Keeps the journal bounded by the list size while nothing drains it.
    fn evict(&mut self, id: u64) {
        let pending_prepend = self
            .pending
            .iter()
            .position(|op| matches!(op, SurfaceOp::Prepend(entry) if entry.id == id));

        match pending_prepend {
            Some(index) => {
                self.pending.remove(index);
            }
            None => self.pending.push(SurfaceOp::Remove { id }),
        }
    }

    /// Replace a pending op matching `is_same`, or append `op`.
    fn replace_or_push(&mut self, op: SurfaceOp, is_same: fn(&SurfaceOp) -> bool) {
        match self.pending.iter_mut().find(|pending| is_same(pending)) {
            Some(pending) => *pending = op,
            None => self.pending.push(op),
        }
    }
}

impl FeedView for FeedSurface {
    fn render(&mut self, entry: String) {
        self.next_id += 1;
        let entry = FeedEntry {
            id: self.next_id,
            text: entry,
        };
        self.entries.push_front(entry.clone());
        self.pending.push(SurfaceOp::Prepend(entry));
    }

    fn trim(&mut self, max_count: usize) {
        while self.entries.len() > max_count {
            let Some(oldest) = self.entries.pop_back() else {
                break;
            };
            self.evict(oldest.id);
        }
    }

    fn input_value(&self) -> &str {
        &self.input_value
    }

    fn set_input_value(&mut self, value: &str) {
        self.input_value = value.to_string();
        self.replace_or_push(SurfaceOp::SetInputValue(value.to_string()), |op| {
            matches!(op, SurfaceOp::SetInputValue(_))
        });
    }

    fn set_button_label(&mut self, label: &str) {
        self.button_label = label.to_string();
        self.replace_or_push(SurfaceOp::SetButtonLabel(label.to_string()), |op| {
            matches!(op, SurfaceOp::SetButtonLabel(_))
        });
    }
}
