//! File-based preference storage.

use super::{MapPreferences, PreferenceStore, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

const PREFERENCES_FILE: &str = "preferences.json";

/// Stores preferences as a JSON file in a directory.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store in the given directory, creating it if needed.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a file store in the default location.
    ///
    /// On Linux: `~/.config/geocapture/`
    /// On Windows: `%APPDATA%\geocapture\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("geocapture"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn preferences_path(&self) -> PathBuf {
        self.base_path.join(PREFERENCES_FILE)
    }
}

impl PreferenceStore for FileStore {
    fn load(&self) -> StorageResult<MapPreferences> {
        let path = self.preferences_path();
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        MapPreferences::from_json(&json)
    }

    fn save(&self, preferences: &MapPreferences) -> StorageResult<()> {
        let path = self.preferences_path();
        let json = preferences.to_json()?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_layer::BaseLayer;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_save_load() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let prefs = MapPreferences {
            base_layer: BaseLayer::Satellite,
        };
        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn test_file_store_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(store.load(), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::new(nested.clone()).unwrap();
        assert!(nested.exists());
        assert_eq!(store.base_path(), nested.as_path());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "{ broken").unwrap();
        assert!(matches!(store.load(), Err(StorageError::Serialization(_))));
        assert_eq!(store.load_or_default(), MapPreferences::default());
    }
}
