//! Presentation surface seam.
//!
//! The coordinator never draws anything itself. It asks a
//! [`PresentationSurface`] to render an asset, run animations and dismiss,
//! always from the coordinator task.

use std::path::Path;
use std::time::Duration;

use splash_types::{Color, ScaleEasing};

/// Invoked once when a fade-out completes.
pub type FadeCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque id for one rendered splash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Presentation surface is unavailable")]
    Unavailable,

    #[error("Animation failed: {0}")]
    Animation(String),
}

/// Where the splash is drawn.
pub trait PresentationSurface: Send {
    /// False once the host has been torn down.
    fn is_available(&self) -> bool {
        true
    }

    fn render(&mut self, asset: &Path, background: Color) -> Result<SurfaceHandle, SurfaceError>;

    /// Scale-in. A `duration_ms` of 0 sets the end scale without animating.
    fn animate_scale(
        &mut self,
        handle: SurfaceHandle,
        from: f32,
        to: f32,
        duration_ms: u64,
        easing: ScaleEasing,
    ) -> Result<(), SurfaceError>;

    /// Start a fade to transparent. `on_complete` must be called once the
    /// fade ends; it may be called from any thread.
    fn animate_fade_out(
        &mut self,
        handle: SurfaceHandle,
        duration_ms: u64,
        on_complete: FadeCallback,
    ) -> Result<(), SurfaceError>;

    fn dismiss(&mut self, handle: SurfaceHandle);
}

// ─────────────────────────────────────────────────────────────────────────────
// Headless Surface
// ─────────────────────────────────────────────────────────────────────────────

/// A surface with no window. Logs every request and completes fades on a
/// tokio timer, so the full lifecycle can run from a terminal.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next_id: u64,
    visible: Option<SurfaceHandle>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Option<SurfaceHandle> {
        self.visible
    }
}

impl PresentationSurface for HeadlessSurface {
    fn render(&mut self, asset: &Path, background: Color) -> Result<SurfaceHandle, SurfaceError> {
        self.next_id += 1;
        let handle = SurfaceHandle(self.next_id);
        self.visible = Some(handle);
        tracing::info!(id = handle.0, asset = %asset.display(), %background, "Splash rendered");
        Ok(handle)
    }

    fn animate_scale(
        &mut self,
        handle: SurfaceHandle,
        from: f32,
        to: f32,
        duration_ms: u64,
        easing: ScaleEasing,
    ) -> Result<(), SurfaceError> {
        tracing::info!(
            id = handle.0,
            from,
            to,
            duration_ms,
            easing = easing.name(),
            "Splash scale-in"
        );
        Ok(())
    }

    fn animate_fade_out(
        &mut self,
        handle: SurfaceHandle,
        duration_ms: u64,
        on_complete: FadeCallback,
    ) -> Result<(), SurfaceError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SurfaceError::Animation(e.to_string()))?;

        tracing::info!(id = handle.0, duration_ms, "Splash fade-out");
        runtime.spawn(async move {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            on_complete();
        });
        Ok(())
    }

    fn dismiss(&mut self, handle: SurfaceHandle) {
        if self.visible == Some(handle) {
            self.visible = None;
        }
        tracing::info!(id = handle.0, "Splash dismissed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_headless_fade_completes_after_duration() {
        let mut surface = HeadlessSurface::new();
        let handle = surface.render(Path::new("/tmp/a.png"), Color::WHITE).unwrap();
        assert_eq!(surface.visible(), Some(handle));

        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        surface
            .animate_fade_out(handle, 200, Box::new(move || flag.store(true, Ordering::SeqCst)))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(199)).await;
        assert!(!done.load(Ordering::SeqCst));
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(done.load(Ordering::SeqCst));

        surface.dismiss(handle);
        assert_eq!(surface.visible(), None);
    }

    #[test]
    fn test_headless_fade_needs_a_runtime() {
        let mut surface = HeadlessSurface::new();
        let handle = surface.render(Path::new("/tmp/a.png"), Color::BLACK).unwrap();
        let result = surface.animate_fade_out(handle, 10, Box::new(|| {}));
        assert!(matches!(result, Err(SurfaceError::Animation(_))));
    }
}
