use splash_core::EligiblePresentation;
use tokio::sync::oneshot;

use crate::state::OverlayState;

/// Messages processed by the coordinator task, in arrival order.
///
/// Timer and animation messages carry the generation of the session that
/// armed them; anything from an older session is dropped.
#[derive(Debug)]
pub(crate) enum Command {
    Show,
    Hide,
    Cleanup,
    Shutdown,
    MaxDurationElapsed { generation: u64 },
    MinDurationElapsed { generation: u64 },
    FadeFinished { generation: u64 },
    FadeWatchdog { generation: u64 },
    Snapshot(oneshot::Sender<CoordinatorSnapshot>),
}

/// Point-in-time view of the coordinator, answered from inside the task.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSnapshot {
    pub state: OverlayState,
    /// Generation of the last session started (0 before the first show).
    pub generation: u64,
    /// Time since the current session was shown.
    pub elapsed_ms: Option<u64>,
    pub hide_requested: bool,
    pub max_timer_armed: bool,
    pub deferred_hide_armed: bool,
    pub fade_watchdog_armed: bool,
    pub presentation: Option<EligiblePresentation>,
}
