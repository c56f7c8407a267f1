//! Live Feed Core
//!
//! Headless viewer logic: message annotation, the bounded display list,
//! pause state and the retain-count preference.
//! No Bevy dependencies - the UI is reached through the [`FeedView`] capability.

mod error;
mod message;
mod prefs;
mod retain;
mod view;
mod viewer;

pub use error::{FeedError, PreferenceError};
pub use message::{FeedMessage, Timestamp};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use retain::{DEFAULT_RETAIN_COUNT, RETAIN_COUNT_KEY, parse_retain_count};
pub use view::{FeedEntry, FeedSurface, FeedView, SurfaceOp};
pub use viewer::{Delivery, FeedViewer, PauseState};
