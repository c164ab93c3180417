//! Dynamic splash overlay lifecycle.
//!
//! The [`coordinator`] decides when a splash is on screen; a
//! [`PresentationSurface`] does the drawing; [`SplashManager`] wires
//! publishing and showing together for hosts.

pub mod coordinator;
pub mod manager;
pub mod state;
pub mod surface;

pub use coordinator::{
    CoordinatorBuilder, CoordinatorHandle, CoordinatorSnapshot, spawn_coordinator,
};
pub use manager::SplashManager;
pub use state::{OverlayState, SharedStatus};
pub use surface::{FadeCallback, HeadlessSurface, PresentationSurface, SurfaceError, SurfaceHandle};
