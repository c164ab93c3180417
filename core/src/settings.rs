//! Loading and saving [`SplashSettings`].
//!
//! Settings live in the platform config directory under `dynamic-splash`,
//! as TOML through `confy`. Explicit paths are supported for tests and for
//! hosts that manage their own config location.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use splash_types::SplashSettings;

use crate::error::Result;
use crate::storage::{FileStore, MetadataStore, SplashStorage};

pub const APP_NAME: &str = "dynamic-splash";

/// Load settings from the default location, falling back to defaults.
pub fn load_settings() -> SplashSettings {
    match confy::load(APP_NAME, None) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Failed to load splash settings, using defaults: {}", e);
            SplashSettings::default()
        }
    }
}

/// Load settings from a specific file. A missing file is created with defaults.
pub fn load_settings_from(path: &Path) -> Result<SplashSettings> {
    Ok(confy::load_path(path)?)
}

pub fn save_settings(settings: &SplashSettings) -> Result<()> {
    confy::store(APP_NAME, None, settings)?;
    Ok(())
}

pub fn save_settings_to(path: &Path, settings: &SplashSettings) -> Result<()> {
    confy::store_path(path, settings)?;
    Ok(())
}

/// Default key-value store file.
pub fn default_storage_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join("storage.json"))
}

/// Build the storage described by the settings.
///
/// Uses the configured file, else the default file, else an in-memory
/// store when no config directory exists on this platform.
pub fn open_storage(settings: &SplashSettings) -> SplashStorage {
    let path = settings.storage_path.clone().or_else(default_storage_path);
    let store: Arc<dyn MetadataStore> = match path {
        Some(path) => Arc::new(FileStore::new(path)),
        None => {
            tracing::warn!("No config directory available, splash metadata will not persist");
            Arc::new(crate::storage::MemoryStore::new())
        }
    };
    SplashStorage::with_key(store, &settings.storage_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings, SplashSettings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut settings = SplashSettings::default();
        settings.storage_key = "CUSTOM".to_string();
        settings.min_duration_ms = 750;
        settings.fade.enabled = false;
        save_settings_to(&path, &settings).unwrap();

        assert_eq!(load_settings_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_open_storage_uses_configured_file_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = SplashSettings::default();
        settings.storage_key = "K".to_string();
        settings.storage_path = Some(dir.path().join("kv.json"));

        let storage = open_storage(&settings);
        assert_eq!(storage.key(), "K");
        storage.set_raw("hello");

        let reopened = FileStore::new(dir.path().join("kv.json"));
        assert_eq!(reopened.get("K").unwrap().as_deref(), Some("hello"));
    }
}
