//! Splash lifecycle coordinator
//!
//! A single task owns the session, its timers and the presentation surface.
//! Callers, timers and fade callbacks all talk to it through one command
//! channel, so transitions never race.
//!
//! ```text
//!          show()                 hide() / max timer
//!   Idle ──────────► Showing ─────────────────────────┐
//!    ▲                  │                             │ min duration left
//!    │                  │ min duration met            ▼
//!    │                  │                HidingPendingMinDuration
//!    │                  ▼                             │ deferred-hide timer
//!    └──────────── HidingAnimating ◄──────────────────┘
//!     fade done /
//!     no fade / failure
//! ```
//!
//! Every timer and fade callback is tagged with the session generation that
//! armed it. Messages from an older generation are dropped.

mod actor;
mod command;
mod handle;
mod timers;


pub use actor::FADE_WATCHDOG_GRACE_MS;
pub use command::CoordinatorSnapshot;
pub use handle::{CoordinatorBuilder, CoordinatorHandle, spawn_coordinator};
