//! Publishing splash configs into stored metadata.
//!
//! A config provider hands over one or more [`SplashConfig`] records. The
//! publisher validates them, picks one whose window is open (weighted
//! random), locates its already-downloaded asset and writes a `READY`
//! record. Any failure leaves an `ERROR` record behind so the next launch
//! shows nothing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rand::Rng;
use splash_types::{ScaleSettings, SplashConfig, SplashMetadata, SplashSettings, SplashStatus};

use crate::error::{Error, Result};
use crate::storage::SplashStorage;
use crate::timestamp::parse_instant;

// ─────────────────────────────────────────────────────────────────────────────
// Asset Location
// ─────────────────────────────────────────────────────────────────────────────

/// Maps a config to the local file holding its asset.
pub trait AssetLocator: Send + Sync {
    fn locate(&self, config: &SplashConfig) -> Option<PathBuf>;
}

/// Assets stored as `<dir>/<imageName>`.
#[derive(Debug, Clone)]
pub struct DirAssetLocator {
    dir: PathBuf,
}

impl DirAssetLocator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl AssetLocator for DirAssetLocator {
    fn locate(&self, config: &SplashConfig) -> Option<PathBuf> {
        // Image names are file names, never paths.
        if config.image_name.contains(['/', '\\']) || config.image_name.starts_with('.') {
            return None;
        }
        let path = self.dir.join(&config.image_name);
        path.is_file().then_some(path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation & Selection
// ─────────────────────────────────────────────────────────────────────────────

/// Check a config's schema and window ordering.
pub fn validate_config(config: &SplashConfig) -> Result<()> {
    let invalid = |msg: &str| Err(Error::InvalidConfig(format!("{}: {}", config.image_name, msg)));

    if config.image_name.is_empty() {
        return Err(Error::InvalidConfig("imageName is empty".to_string()));
    }
    if !config.image_url.starts_with("http") {
        return invalid("imageUrl must be http(s)");
    }
    if config.config_version.is_empty() {
        return invalid("configVersion is empty");
    }
    if let Some(weight) = config.weight
        && (!weight.is_finite() || weight < 0.0)
    {
        return invalid("weight must be a non-negative number");
    }

    let (Some(start), Some(end)) = (parse_instant(&config.start_at), parse_instant(&config.end_at))
    else {
        return invalid("startAt/endAt must be ISO-8601 instants");
    };
    if start >= end {
        return invalid("startAt must be before endAt");
    }
    Ok(())
}

/// Whether `now` falls inside the config's window (inclusive).
pub fn is_within_window(config: &SplashConfig, now: DateTime<Utc>) -> bool {
    match (parse_instant(&config.start_at), parse_instant(&config.end_at)) {
        (Some(start), Some(end)) => start <= now && now <= end,
        _ => false,
    }
}

/// Weighted random pick. Falls back to the last candidate on rounding drift.
pub fn select_by_weight<'a, R: Rng + ?Sized>(
    configs: &'a [SplashConfig],
    rng: &mut R,
) -> Option<&'a SplashConfig> {
    let candidates: Vec<&SplashConfig> =
        configs.iter().filter(|c| !c.image_url.is_empty()).collect();
    let last = *candidates.last()?;

    let total: f64 = candidates.iter().map(|c| c.effective_weight()).sum();
    let mut roll = rng.r#gen::<f64>() * total;

    for config in candidates {
        let weight = config.effective_weight();
        if roll < weight {
            return Some(config);
        }
        roll -= weight;
    }
    Some(last)
}

/// Validated scale-in options: start and end together, duration > 0.
fn normalize_scale(scale: Option<&ScaleSettings>) -> Result<Option<ScaleSettings>> {
    let Some(scale) = scale else {
        return Ok(None);
    };

    match (scale.start_scale, scale.end_scale, scale.duration_ms) {
        (None, None, _) => Ok(None),
        (Some(_), None, _) | (None, Some(_), _) => Err(Error::InvalidScale(
            "start_scale and end_scale must be provided together".to_string(),
        )),
        (Some(_), Some(_), None) => Err(Error::InvalidScale(
            "duration_ms must be provided".to_string(),
        )),
        (Some(_), Some(_), Some(0)) => Err(Error::InvalidScale(
            "duration_ms must be > 0".to_string(),
        )),
        (Some(_), Some(_), Some(_)) => Ok(Some(*scale)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Publisher
// ─────────────────────────────────────────────────────────────────────────────

/// Writes metadata records for incoming configs.
pub struct Publisher {
    storage: SplashStorage,
    settings: SplashSettings,
    locator: Box<dyn AssetLocator>,
}

impl Publisher {
    pub fn new(
        storage: SplashStorage,
        settings: SplashSettings,
        locator: Box<dyn AssetLocator>,
    ) -> Self {
        Self {
            storage,
            settings,
            locator,
        }
    }

    pub fn storage(&self) -> &SplashStorage {
        &self.storage
    }

    pub fn settings(&self) -> &SplashSettings {
        &self.settings
    }

    /// Publish using the thread-local RNG for selection.
    pub fn publish(&self, configs: &[SplashConfig], now: DateTime<Utc>) -> Result<SplashMetadata> {
        self.publish_with_rng(configs, now, &mut rand::thread_rng())
    }

    /// Publish with an explicit RNG. On failure an `ERROR` record is stored.
    pub fn publish_with_rng<R: Rng + ?Sized>(
        &self,
        configs: &[SplashConfig],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SplashMetadata> {
        match self.try_publish(configs, now, rng) {
            Ok(meta) => {
                self.storage.set_meta(&meta);
                tracing::info!(
                    image = meta.image_name.as_deref().unwrap_or_default(),
                    "Splash config published, ready for next show"
                );
                Ok(meta)
            }
            Err(e) => {
                tracing::warn!("Splash publish failed: {}", e);
                self.storage
                    .set_meta(&SplashMetadata::error(e.to_string(), now.timestamp_millis()));
                Err(e)
            }
        }
    }

    fn try_publish<R: Rng + ?Sized>(
        &self,
        configs: &[SplashConfig],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SplashMetadata> {
        if configs.is_empty() {
            return Err(Error::EmptyConfigList);
        }
        for config in configs {
            validate_config(config)?;
        }

        let eligible: Vec<SplashConfig> = configs
            .iter()
            .filter(|c| is_within_window(c, now))
            .cloned()
            .collect();
        let config = select_by_weight(&eligible, rng).ok_or(Error::NoEligibleConfig)?;
        tracing::debug!(
            image = %config.image_name,
            weight = config.effective_weight(),
            candidates = eligible.len(),
            "Selected splash config"
        );

        let local_path = self.resolve_asset(config)?;
        let scale = normalize_scale(self.settings.scale.as_ref())?;
        let fade = self.settings.fade;
        let stamp = now.timestamp_millis();

        Ok(SplashMetadata {
            status: SplashStatus::Ready,
            image_name: Some(config.image_name.clone()),
            start_at: Some(config.start_at.clone()),
            end_at: Some(config.end_at.clone()),
            image_url: Some(config.image_url.clone()),
            alt: Some(config.alt.clone()),
            local_path: Some(local_path.to_string_lossy().into_owned()),
            updated_at: Some(stamp),
            fetched_at: Some(stamp),
            last_error: None,
            background_color: config.background_color.clone(),
            config_version: Some(config.config_version.clone()),
            enable_fade: Some(fade.enabled),
            fade_duration_ms: Some(fade.duration_ms as f64),
            scale_start: scale.and_then(|s| s.start_scale).map(f64::from),
            scale_end: scale.and_then(|s| s.end_scale).map(f64::from),
            scale_duration_ms: scale.and_then(|s| s.duration_ms).map(|d| d as f64),
            scale_easing: scale.and_then(|s| s.easing).map(|e| e.name().to_string()),
            min_duration_ms: Some(self.settings.min_duration_ms as f64),
            max_duration_ms: Some(self.settings.max_duration_ms as f64),
        })
    }

    /// Reuse the current asset if the stored record already describes this
    /// exact config, otherwise ask the locator.
    fn resolve_asset(&self, config: &SplashConfig) -> Result<PathBuf> {
        let current = self.storage.get_meta();
        let unchanged = current.is_ready()
            && current.image_name.as_deref() == Some(config.image_name.as_str())
            && current.config_version.as_deref() == Some(config.config_version.as_str())
            && current.image_url.as_deref() == Some(config.image_url.as_str());

        if unchanged
            && let Some(path) = current.local_path.as_deref().map(Path::new)
            && path.is_file()
        {
            tracing::debug!(image = %config.image_name, "Asset unchanged, reusing cached file");
            return Ok(path.to_path_buf());
        }

        self.locator
            .locate(config)
            .ok_or_else(|| Error::AssetUnavailable(config.image_name.clone()))
    }
}
