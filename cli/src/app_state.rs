use std::sync::Arc;

use splash_core::{Clock, SystemClock, open_storage};
use splash_overlay::{CoordinatorHandle, HeadlessSurface, spawn_coordinator};
use splash_types::SplashSettings;
use tokio::task::JoinHandle;

/// Everything the REPL commands operate on.
pub struct AppState {
    pub settings: SplashSettings,
    pub coordinator: CoordinatorHandle,
    pub clock: Arc<dyn Clock>,
    pub coordinator_task: Option<JoinHandle<()>>,
}

impl AppState {
    /// Open storage from `settings` and start a headless coordinator.
    /// Must be called inside a tokio runtime.
    pub fn new(settings: SplashSettings) -> Self {
        let storage = open_storage(&settings);
        let (coordinator, task) = spawn_coordinator(storage, HeadlessSurface::new());
        Self {
            settings,
            coordinator,
            clock: Arc::new(SystemClock),
            coordinator_task: Some(task),
        }
    }
}
