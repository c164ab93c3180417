//! Host-facing entry point: publish configs, then show or hide.

use std::sync::Arc;

use splash_core::{Clock, Publisher, Result};
use splash_types::{SplashConfig, SplashMetadata};

use crate::coordinator::CoordinatorHandle;

/// Ties a [`Publisher`] to a running coordinator.
///
/// Both should share the same storage so a publish is visible to the next
/// show.
pub struct SplashManager {
    publisher: Publisher,
    coordinator: CoordinatorHandle,
    clock: Arc<dyn Clock>,
}

impl SplashManager {
    pub fn new(publisher: Publisher, coordinator: CoordinatorHandle, clock: Arc<dyn Clock>) -> Self {
        Self {
            publisher,
            coordinator,
            clock,
        }
    }

    /// Publish `configs`. Shows right away when `show_on_update` is set.
    pub fn mount(&self, configs: &[SplashConfig]) -> Result<SplashMetadata> {
        let meta = self.publisher.publish(configs, self.clock.now())?;
        if self.publisher.settings().show_on_update {
            tracing::debug!("Showing splash after update");
            self.coordinator.show();
        }
        Ok(meta)
    }

    pub fn show(&self) {
        self.coordinator.show();
    }

    pub fn hide(&self) {
        self.coordinator.hide();
    }

    pub fn is_visible(&self) -> bool {
        self.coordinator.is_showing()
    }

    pub fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinator::CoordinatorBuilder;
    use crate::surface::HeadlessSurface;
    use splash_core::{DirAssetLocator, ManualClock, MemoryStore, SplashStorage, parse_instant};
    use splash_types::{SplashSettings, SplashStatus};

    fn config(name: &str) -> SplashConfig {
        SplashConfig {
            image_name: name.to_string(),
            alt: String::new(),
            start_at: "2025-06-01T00:00:00Z".to_string(),
            end_at: "2025-06-30T00:00:00Z".to_string(),
            image_url: format!("https://cdn.example.com/{name}.png"),
            config_version: "3".to_string(),
            background_color: Some("#FF000000".to_string()),
            weight: None,
        }
    }

    fn manager(show_on_update: bool, dir: &std::path::Path) -> SplashManager {
        let clock = Arc::new(ManualClock::new(
            parse_instant("2025-06-15T12:00:00Z").unwrap(),
        ));
        let storage = SplashStorage::new(Arc::new(MemoryStore::new()));
        let settings = SplashSettings {
            show_on_update,
            ..SplashSettings::default()
        };
        let publisher = Publisher::new(
            storage.clone(),
            settings,
            Box::new(DirAssetLocator::new(dir)),
        );
        let (handle, _task) = CoordinatorBuilder::new(storage)
            .clock(clock.clone())
            .spawn(HeadlessSurface::new());
        SplashManager::new(publisher, handle, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_with_show_on_update() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summer"), b"img").unwrap();
        let m = manager(true, dir.path());

        let meta = m.mount(&[config("summer")]).unwrap();
        assert_eq!(meta.status, SplashStatus::Ready);
        m.coordinator().snapshot().await.unwrap();
        assert!(m.is_visible());

        m.hide();
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        m.coordinator().snapshot().await.unwrap();
        assert!(!m.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_without_show_on_update() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("summer"), b"img").unwrap();
        let m = manager(false, dir.path());

        m.mount(&[config("summer")]).unwrap();
        m.coordinator().snapshot().await.unwrap();
        assert!(!m.is_visible());

        m.show();
        m.coordinator().snapshot().await.unwrap();
        assert!(m.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_mount_never_shows() {
        let dir = tempfile::tempdir().unwrap();
        let m = manager(true, dir.path());

        assert!(m.mount(&[config("absent")]).is_err());
        assert_eq!(m.publisher().storage().get_meta().status, SplashStatus::Error);

        m.show();
        m.coordinator().snapshot().await.unwrap();
        assert!(!m.is_visible());
    }
}
