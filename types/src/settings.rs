//! User-facing settings, persisted as TOML.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metadata::ScaleEasing;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "DYNAMIC_SPLASH_META_V1";

/// Settings applied when publishing metadata and wiring up the coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplashSettings {
    /// Key the metadata blob is stored under.
    pub storage_key: String,
    /// Key-value store file. `None` uses the platform config directory.
    pub storage_path: Option<PathBuf>,
    /// Directory holding already-downloaded assets, one file per image name.
    pub asset_dir: Option<PathBuf>,
    /// Minimum visible time once shown.
    pub min_duration_ms: u64,
    /// Auto-hide after this long. 0 disables the cap.
    pub max_duration_ms: u64,
    pub fade: FadeSettings,
    pub scale: Option<ScaleSettings>,
    /// Show right after a successful publish in the same session.
    pub show_on_update: bool,
}

impl Default for SplashSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_path: None,
            asset_dir: None,
            min_duration_ms: 0,
            max_duration_ms: 0,
            fade: FadeSettings::default(),
            scale: None,
            show_on_update: false,
        }
    }
}

/// Fade-out on hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeSettings {
    pub enabled: bool,
    pub duration_ms: u64,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 200,
        }
    }
}

/// Scale-in on show. Start and end must be set together.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    pub start_scale: Option<f32>,
    pub end_scale: Option<f32>,
    pub duration_ms: Option<u64>,
    pub easing: Option<ScaleEasing>,
}
