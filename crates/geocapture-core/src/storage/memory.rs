//! In-memory preference storage.

use super::{MapPreferences, PreferenceStore, StorageError, StorageResult};
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    preferences: RwLock<Option<MapPreferences>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self) -> StorageResult<MapPreferences> {
        let prefs = self
            .preferences
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        prefs
            .clone()
            .ok_or_else(|| StorageError::NotFound("memory".to_string()))
    }

    fn save(&self, preferences: &MapPreferences) -> StorageResult<()> {
        let mut prefs = self
            .preferences
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        *prefs = Some(preferences.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_layer::BaseLayer;

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let prefs = MapPreferences {
            base_layer: BaseLayer::Satellite,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.load(), Err(StorageError::NotFound(_))));
        assert_eq!(store.load_or_default(), MapPreferences::default());
    }
}
