//! Persistence for user map preferences.
//!
//! Geometries are never stored here; persisting them is the caller's job.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::base_layer::BaseLayer;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Preferences not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Preferences remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPreferences {
    pub base_layer: BaseLayer,
}

impl MapPreferences {
    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> StorageResult<Self> {
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Trait for preference storage backends.
pub trait PreferenceStore {
    /// Load stored preferences.
    fn load(&self) -> StorageResult<MapPreferences>;

    /// Save preferences, replacing any stored ones.
    fn save(&self, preferences: &MapPreferences) -> StorageResult<()>;

    /// Load stored preferences, falling back to defaults on any error.
    fn load_or_default(&self) -> MapPreferences {
        match self.load() {
            Ok(prefs) => prefs,
            Err(StorageError::NotFound(_)) => MapPreferences::default(),
            Err(e) => {
                log::warn!("Using default map preferences: {}", e);
                MapPreferences::default()
            }
        }
    }
}
