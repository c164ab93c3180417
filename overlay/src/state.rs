//! Coordinator state and its shared, read-only view.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{PoisonError, RwLock};

/// Lifecycle of one splash session. `Idle` is both initial and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlayState {
    #[default]
    Idle,
    Showing,
    /// Hide requested, waiting out the minimum visible time.
    HidingPendingMinDuration,
    /// Exit animation running.
    HidingAnimating,
}

impl OverlayState {
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Showing => "showing",
            Self::HidingPendingMinDuration => "hiding (min duration)",
            Self::HidingAnimating => "hiding (animating)",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Showing => 1,
            Self::HidingPendingMinDuration => 2,
            Self::HidingAnimating => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Showing,
            2 => Self::HidingPendingMinDuration,
            3 => Self::HidingAnimating,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Written only by the coordinator task, read from anywhere without a
/// round-trip through the event loop.
#[derive(Debug, Default)]
pub struct SharedStatus {
    state: AtomicU8,
    last_meta: RwLock<Option<String>>,
}

impl SharedStatus {
    pub fn state(&self) -> OverlayState {
        OverlayState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_showing(&self) -> bool {
        !self.state().is_idle()
    }

    pub fn last_meta(&self) -> Option<String> {
        self.last_meta
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_state(&self, state: OverlayState) {
        self.state.store(state.to_u8(), Ordering::SeqCst);
    }

    pub(crate) fn set_last_meta(&self, raw: Option<String>) {
        *self.last_meta.write().unwrap_or_else(PoisonError::into_inner) = raw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_roundtrips_through_status() {
        let status = SharedStatus::default();
        assert_eq!(status.state(), OverlayState::Idle);
        assert!(!status.is_showing());

        for state in [
            OverlayState::Showing,
            OverlayState::HidingPendingMinDuration,
            OverlayState::HidingAnimating,
        ] {
            status.set_state(state);
            assert_eq!(status.state(), state);
            assert!(status.is_showing());
        }

        status.set_state(OverlayState::Idle);
        assert!(!status.is_showing());
    }

    #[test]
    fn test_last_meta() {
        let status = SharedStatus::default();
        assert_eq!(status.last_meta(), None);
        status.set_last_meta(Some("{}".to_string()));
        assert_eq!(status.last_meta().as_deref(), Some("{}"));
    }
}
