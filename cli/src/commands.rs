use std::path::{Path, PathBuf};
use std::sync::Arc;

use splash_core::{DirAssetLocator, Publisher};
use splash_overlay::SplashManager;
use splash_types::SplashConfig;
use splash_types::formatting::{format_cap_ms, format_duration_ms};
use tokio::sync::RwLock;

use crate::app_state::AppState;

/// Accepts a single config object or an array of them.
pub fn parse_configs(contents: &str) -> Result<Vec<SplashConfig>, String> {
    let parsed = if contents.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<SplashConfig>>(contents)
    } else {
        serde_json::from_str::<SplashConfig>(contents).map(|c| vec![c])
    };
    parsed.map_err(|e| format!("Invalid config file: {}", e))
}

pub async fn publish(
    config: &Path,
    assets: Option<&Path>,
    state: Arc<RwLock<AppState>>,
) -> Result<(), String> {
    let contents = std::fs::read_to_string(config)
        .map_err(|e| format!("Failed to read {}: {}", config.display(), e))?;
    let configs = parse_configs(&contents)?;

    let s = state.read().await;
    let asset_dir: PathBuf = assets
        .map(Path::to_path_buf)
        .or_else(|| s.settings.asset_dir.clone())
        .ok_or("No asset directory: pass --assets or set asset_dir in settings")?;

    let publisher = Publisher::new(
        s.coordinator.storage().clone(),
        s.settings.clone(),
        Box::new(DirAssetLocator::new(asset_dir)),
    );
    let manager = SplashManager::new(publisher, s.coordinator.clone(), Arc::clone(&s.clock));

    let meta = manager.mount(&configs).map_err(|e| e.to_string())?;
    println!(
        "Published '{}' (version {})",
        meta.image_name.as_deref().unwrap_or_default(),
        meta.config_version.as_deref().unwrap_or_default()
    );
    Ok(())
}

pub async fn show(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    state.read().await.coordinator.show();
    Ok(())
}

pub async fn hide(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    state.read().await.coordinator.hide();
    Ok(())
}

pub async fn show_status(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let s = state.read().await;
    let snapshot = s
        .coordinator
        .snapshot()
        .await
        .ok_or("Coordinator is not running")?;

    println!("State: {}", snapshot.state);
    println!("Storage key: {}", s.coordinator.storage_key());
    println!("Sessions started: {}", snapshot.generation);
    if let Some(elapsed) = snapshot.elapsed_ms {
        println!("Visible for: {}", format_duration_ms(elapsed));
    }
    if let Some(p) = &snapshot.presentation {
        println!("Asset: {}", p.asset_path.display());
        println!("Background: {}", p.background);
        println!("Min duration: {}", format_duration_ms(p.min_duration_ms));
        println!("Max duration: {}", format_cap_ms(p.max_duration_ms));
        if p.fades_out() {
            println!("Fade: {}", format_duration_ms(p.fade_duration_ms));
        } else {
            println!("Fade: off");
        }
    }
    if snapshot.hide_requested {
        println!("Hide requested");
    }
    Ok(())
}

pub async fn show_meta(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let s = state.read().await;
    let stored = s.coordinator.storage().get_raw();
    let observed = s.coordinator.last_observed_metadata();

    println!("Stored:\n{}", pretty(stored.as_deref()));
    println!("Last observed:\n{}", pretty(observed.as_deref()));
    Ok(())
}

pub async fn set_key(key: &str, state: Arc<RwLock<AppState>>) -> Result<(), String> {
    if key.is_empty() {
        return Err("Storage key cannot be empty".to_string());
    }
    let s = state.read().await;
    s.coordinator.set_storage_key(key);
    println!("Storage key set to {}", s.coordinator.storage_key());
    Ok(())
}

pub async fn clear(state: Arc<RwLock<AppState>>) -> Result<(), String> {
    let s = state.read().await;
    s.coordinator
        .storage()
        .remove_async()
        .await
        .map_err(|e| e.to_string())?;
    println!("Cleared {}", s.coordinator.storage_key());
    Ok(())
}

pub async fn exit(state: Arc<RwLock<AppState>>) {
    let mut s = state.write().await;
    s.coordinator.shutdown();
    if let Some(task) = s.coordinator_task.take()
        && let Err(e) = task.await
    {
        tracing::warn!("Coordinator task ended abnormally: {}", e);
    }
}

fn pretty(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "  (none)".to_string();
    };
    serde_json::from_str::<serde_json::Value>(raw)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| raw.to_string())
}
