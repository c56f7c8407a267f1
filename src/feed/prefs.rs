use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use super::error::PreferenceError;

/// Persistent string key-value store (the `localStorage` of the viewer).
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, persisting it immediately.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Clones share the same values.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .write()
            .map_err(|_| PreferenceError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

/// Store backed by a JSON object file, rewritten on every `set`.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    file: PreferenceFile,
}

impl FilePreferenceStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let file = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| {
                PreferenceError::Json {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => PreferenceFile::default(),
            Err(source) => return Err(PreferenceError::Io { path, source }),
        };

        log::debug!(
            "[Preferences] Loaded {} value(s) from {}",
            file.values.len(),
            path.display()
        );

        Ok(Self { path, file })
    }

    /// `<data_local_dir>/bevy_live_feed/preferences.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join("bevy_live_feed").join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let io_err = |source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content =
            serde_json::to_string_pretty(&self.file).map_err(|source| PreferenceError::Json {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, content).map_err(io_err)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.file.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.file.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}
