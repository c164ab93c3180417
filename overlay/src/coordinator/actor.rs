use std::sync::Arc;
use std::time::Duration;

use splash_core::{AssetProbe, Clock, EligiblePresentation, SplashStorage, evaluate_with};
use tokio::sync::mpsc::{UnboundedReceiver, WeakUnboundedSender};
use tokio::time::Instant;

use super::command::{Command, CoordinatorSnapshot};
use super::timers::TimerSlot;
use crate::state::{OverlayState, SharedStatus};
use crate::surface::{FadeCallback, PresentationSurface, SurfaceHandle};

/// Extra time a fade gets before the session is finalized without it.
pub const FADE_WATCHDOG_GRACE_MS: u64 = 1000;

/// The one active session. Durations are captured at show time.
#[derive(Debug)]
struct Session {
    generation: u64,
    started_at: Instant,
    presentation: EligiblePresentation,
    handle: SurfaceHandle,
    hide_requested: bool,
}

/// Owns all lifecycle state. Lives on a single tokio task; every entry
/// point reaches it as a [`Command`].
pub(crate) struct Coordinator<S> {
    surface: S,
    storage: SplashStorage,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn AssetProbe>,
    status: Arc<SharedStatus>,
    tx: WeakUnboundedSender<Command>,
    state: OverlayState,
    generation: u64,
    session: Option<Session>,
    max_timer: TimerSlot,
    deferred_hide: TimerSlot,
    fade_watchdog: TimerSlot,
}

impl<S: PresentationSurface> Coordinator<S> {
    pub fn new(
        surface: S,
        storage: SplashStorage,
        clock: Arc<dyn Clock>,
        probe: Arc<dyn AssetProbe>,
        status: Arc<SharedStatus>,
        tx: WeakUnboundedSender<Command>,
    ) -> Self {
        Self {
            surface,
            storage,
            clock,
            probe,
            status,
            tx,
            state: OverlayState::Idle,
            generation: 0,
            session: None,
            max_timer: TimerSlot::new("max_duration"),
            deferred_hide: TimerSlot::new("deferred_hide"),
            fade_watchdog: TimerSlot::new("fade_watchdog"),
        }
    }

    /// Process commands until shutdown or until every handle is dropped.
    pub async fn run(mut self, mut rx: UnboundedReceiver<Command>) {
        while let Some(cmd) = rx.recv().await {
            match cmd {
                Command::Shutdown => break,
                cmd => self.handle(cmd),
            }
        }
        self.cleanup();
        tracing::debug!("Splash coordinator stopped");
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Show => self.show(),
            Command::Hide => self.hide(),
            Command::Cleanup => self.cleanup(),
            Command::Shutdown => {}
            Command::MaxDurationElapsed { generation } => {
                if self.is_current(generation) {
                    tracing::debug!(generation, "Max duration reached, hiding splash");
                    self.hide();
                }
            }
            Command::MinDurationElapsed { generation } => {
                if self.is_current(generation)
                    && self.state == OverlayState::HidingPendingMinDuration
                {
                    self.begin_exit();
                }
            }
            Command::FadeFinished { generation } => {
                if self.is_current(generation) && self.state == OverlayState::HidingAnimating {
                    self.finalize();
                }
            }
            Command::FadeWatchdog { generation } => {
                if self.is_current(generation) && self.state == OverlayState::HidingAnimating {
                    tracing::warn!(generation, "Fade never completed, finalizing splash");
                    self.finalize();
                }
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Show
    // ─────────────────────────────────────────────────────────────────────────

    fn show(&mut self) {
        if !self.state.is_idle() {
            tracing::trace!(state = %self.state, "Show ignored, session active");
            return;
        }
        if !self.surface.is_available() {
            tracing::debug!("Show ignored, presentation surface unavailable");
            return;
        }

        let raw = self.storage.get_raw();
        self.status.set_last_meta(raw.clone());

        let presentation = match evaluate_with(raw.as_deref(), self.clock.now(), self.probe.as_ref())
        {
            Ok(p) => p,
            Err(reason) => {
                tracing::debug!(reason = reason.reason(), "Splash not eligible");
                return;
            }
        };

        let handle = match self
            .surface
            .render(&presentation.asset_path, presentation.background)
        {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("Failed to render splash: {}", e);
                return;
            }
        };

        self.generation += 1;
        let generation = self.generation;

        if let Some(scale) = presentation.scale
            && let Err(e) = self.surface.animate_scale(
                handle,
                scale.from,
                scale.to,
                scale.duration_ms,
                scale.easing(),
            )
        {
            tracing::warn!("Scale-in failed: {}", e);
        }

        if presentation.max_duration_ms > 0 {
            self.max_timer.arm(
                Duration::from_millis(presentation.max_duration_ms),
                self.tx.clone(),
                Command::MaxDurationElapsed { generation },
            );
        }

        tracing::debug!(
            generation,
            asset = %presentation.asset_path.display(),
            min_ms = presentation.min_duration_ms,
            max_ms = presentation.max_duration_ms,
            "Splash showing"
        );
        self.session = Some(Session {
            generation,
            started_at: Instant::now(),
            presentation,
            handle,
            hide_requested: false,
        });
        self.set_state(OverlayState::Showing);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Hide
    // ─────────────────────────────────────────────────────────────────────────

    fn hide(&mut self) {
        let Some(session) = self.session.as_mut() else {
            tracing::trace!("Hide ignored, nothing showing");
            return;
        };
        if session.hide_requested {
            tracing::trace!(generation = session.generation, "Hide already in progress");
            return;
        }
        session.hide_requested = true;

        let generation = session.generation;
        let min = Duration::from_millis(session.presentation.min_duration_ms);
        let remaining = min.saturating_sub(session.started_at.elapsed());

        self.max_timer.cancel();

        if remaining.is_zero() {
            self.begin_exit();
            return;
        }

        tracing::debug!(
            generation,
            remaining_ms = remaining.as_millis() as u64,
            "Hide deferred until min duration"
        );
        self.set_state(OverlayState::HidingPendingMinDuration);
        self.deferred_hide.arm(
            remaining,
            self.tx.clone(),
            Command::MinDurationElapsed { generation },
        );
    }

    /// Run the exit animation, or finalize straight away.
    fn begin_exit(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let generation = session.generation;
        let handle = session.handle;
        let fade = session
            .presentation
            .fades_out()
            .then_some(session.presentation.fade_duration_ms);

        self.deferred_hide.cancel();
        self.set_state(OverlayState::HidingAnimating);

        let Some(fade_ms) = fade else {
            self.finalize();
            return;
        };
        if !self.surface.is_available() {
            tracing::debug!("Surface gone before fade, finalizing");
            self.finalize();
            return;
        }

        let tx = self.tx.clone();
        let on_complete: FadeCallback = Box::new(move || {
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::FadeFinished { generation });
            }
        });

        match self.surface.animate_fade_out(handle, fade_ms, on_complete) {
            Ok(()) => {
                tracing::debug!(generation, fade_ms, "Splash fading out");
                self.fade_watchdog.arm(
                    Duration::from_millis(fade_ms.saturating_add(FADE_WATCHDOG_GRACE_MS)),
                    self.tx.clone(),
                    Command::FadeWatchdog { generation },
                );
            }
            Err(e) => {
                tracing::warn!("Fade-out failed, finalizing: {}", e);
                self.finalize();
            }
        }
    }

    /// Dismiss the surface, drop the session and return to idle.
    fn finalize(&mut self) {
        self.max_timer.cancel();
        self.deferred_hide.cancel();
        self.fade_watchdog.cancel();

        if let Some(session) = self.session.take() {
            self.surface.dismiss(session.handle);
            tracing::debug!(generation = session.generation, "Splash finalized");
        }
        self.set_state(OverlayState::Idle);
    }

    /// Teardown from any state. Safe to repeat.
    fn cleanup(&mut self) {
        if self.session.is_some() {
            tracing::debug!(state = %self.state, "Cleaning up active splash");
        }
        self.finalize();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn is_current(&self, generation: u64) -> bool {
        let current = self
            .session
            .as_ref()
            .is_some_and(|s| s.generation == generation);
        if !current {
            tracing::trace!(generation, "Discarding stale timer event");
        }
        current
    }

    fn set_state(&mut self, state: OverlayState) {
        if self.state != state {
            tracing::trace!(from = %self.state, to = %state, "Splash state change");
        }
        self.state = state;
        self.status.set_state(state);
    }

    fn snapshot(&self) -> CoordinatorSnapshot {
        let session = self.session.as_ref();
        CoordinatorSnapshot {
            state: self.state,
            generation: self.generation,
            elapsed_ms: session.map(|s| s.started_at.elapsed().as_millis() as u64),
            hide_requested: session.is_some_and(|s| s.hide_requested),
            max_timer_armed: self.max_timer.is_armed(),
            deferred_hide_armed: self.deferred_hide.is_armed(),
            fade_watchdog_armed: self.fade_watchdog.is_armed(),
            presentation: session.map(|s| s.presentation.clone()),
        }
    }
}
