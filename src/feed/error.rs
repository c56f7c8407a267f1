use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while handling an incoming feed message.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Malformed message payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Message payload is null")]
    NullMessage,
}

/// Errors raised by a [`PreferenceStore`](super::PreferenceStore).
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Preference file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Preference store is poisoned")]
    Poisoned,
}
