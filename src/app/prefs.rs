// PoolWatch - app/prefs.rs
//
// Durable key-value preference storage. The dashboard keeps one entry,
// "darkMode" = "true" | "false", read once at startup and written on every
// toggle.
//
// Design principles:
// - The file is a flat JSON object of string values, saved atomically
//   (write temp, rename) so a crash during save never corrupts it.
// - Missing or malformed files load as empty: the app starts with default
//   preferences rather than refusing to start.

use crate::platform::fs;
use crate::util::constants::PREFERENCES_FILE_NAME;
use crate::util::error::PreferenceError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A durable string key-value store.
pub trait PreferenceStore: Send {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, persisting it before returning.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Resolve the preference file path from the platform data directory.
pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE_NAME)
}

// =============================================================================
// File-backed store
// =============================================================================

/// Preferences persisted as a JSON file.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Open the store at `path`, loading any existing values.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load(&path);
        Self { path, values }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut next = self.values.clone();
        next.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&next)
            .map_err(|source| PreferenceError::Serialize { source })?;
        fs::write_atomic(&self.path, json.as_bytes()).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })?;

        // Only adopt the new value once it is on disk.
        self.values = next;
        tracing::debug!(path = %self.path.display(), key, "Preference saved");
        Ok(())
    }
}

/// Load the preference map from `path`. Returns an empty map on any error.
fn load(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_optional(path) {
        Ok(Some(c)) => c,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot read preferences; using defaults");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(values) => {
            tracing::debug!(path = %path.display(), "Preferences loaded");
            values
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Preference file is malformed; using defaults"
            );
            BTreeMap::new()
        }
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Preferences held in memory. Clones share the same map, so a second
/// store built from a clone observes earlier writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Unit tests
// =============================================================================
