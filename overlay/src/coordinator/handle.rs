use std::sync::Arc;

use splash_core::{AssetProbe, Clock, FsAssetProbe, SplashStorage, SystemClock};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::actor::Coordinator;
use super::command::{Command, CoordinatorSnapshot};
use crate::state::{OverlayState, SharedStatus};
use crate::surface::PresentationSurface;

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Cheap, cloneable front door to a running coordinator.
///
/// Commands never block; they are queued and handled in order on the
/// coordinator task. Once the coordinator has stopped they are dropped.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: UnboundedSender<Command>,
    status: Arc<SharedStatus>,
    storage: SplashStorage,
}

impl CoordinatorHandle {
    pub fn show(&self) {
        self.send(Command::Show);
    }

    pub fn hide(&self) {
        self.send(Command::Hide);
    }

    /// Cancel all timers and force-dismiss any visible splash.
    pub fn cleanup(&self) {
        self.send(Command::Cleanup);
    }

    /// Clean up and stop the coordinator task.
    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }

    pub fn is_showing(&self) -> bool {
        self.status.is_showing()
    }

    pub fn state(&self) -> OverlayState {
        self.status.state()
    }

    /// Raw blob read by the most recent show, eligible or not.
    pub fn last_observed_metadata(&self) -> Option<String> {
        self.status.last_meta()
    }

    pub fn last_loaded_meta(&self) -> Option<String> {
        self.last_observed_metadata()
    }

    /// Change the key later shows read from. Empty keys are ignored.
    pub fn set_storage_key(&self, key: &str) {
        self.storage.set_key(key);
    }

    pub fn storage_key(&self) -> String {
        self.storage.key()
    }

    pub fn storage(&self) -> &SplashStorage {
        &self.storage
    }

    /// Ask the coordinator for its state. `None` once it has stopped.
    ///
    /// Answered after every command queued before it, so it doubles as a
    /// way to wait for earlier commands to be processed.
    pub async fn snapshot(&self) -> Option<CoordinatorSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::Snapshot(reply)).ok()?;
        rx.await.ok()
    }

    fn send(&self, cmd: Command) {
        if self.tx.send(cmd).is_err() {
            tracing::trace!("Coordinator stopped, command dropped");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Configures and spawns a coordinator.
pub struct CoordinatorBuilder {
    storage: SplashStorage,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn AssetProbe>,
}

impl CoordinatorBuilder {
    pub fn new(storage: SplashStorage) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            probe: Arc::new(FsAssetProbe),
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn asset_probe(mut self, probe: Arc<dyn AssetProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Spawn the coordinator task on the current tokio runtime.
    ///
    /// The task ends on [`CoordinatorHandle::shutdown`] or when the last
    /// handle is dropped, cleaning up either way.
    pub fn spawn<S>(self, surface: S) -> (CoordinatorHandle, JoinHandle<()>)
    where
        S: PresentationSurface + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let status = Arc::new(SharedStatus::default());

        let coordinator = Coordinator::new(
            surface,
            self.storage.clone(),
            self.clock,
            self.probe,
            Arc::clone(&status),
            tx.downgrade(),
        );
        let task = tokio::spawn(coordinator.run(rx));

        let handle = CoordinatorHandle {
            tx,
            status,
            storage: self.storage,
        };
        (handle, task)
    }
}

/// Spawn a coordinator with the system clock and filesystem probe.
pub fn spawn_coordinator<S>(storage: SplashStorage, surface: S) -> (CoordinatorHandle, JoinHandle<()>)
where
    S: PresentationSurface + 'static,
{
    CoordinatorBuilder::new(storage).spawn(surface)
}
