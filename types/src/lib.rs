//! Shared types for the dynamic splash overlay.
//!
//! Everything in here is plain data: the stored metadata record, the
//! config records fed to the publisher, the user-facing settings and the
//! color type. No IO and no clocks live in this crate.

pub mod color;
pub mod config;
pub mod formatting;
pub mod metadata;
pub mod settings;

pub use color::Color;
pub use config::SplashConfig;
pub use metadata::{ScaleEasing, SplashMetadata, SplashStatus};
pub use settings::{DEFAULT_STORAGE_KEY, FadeSettings, ScaleSettings, SplashSettings};
