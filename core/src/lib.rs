pub mod clock;
pub mod error;
pub mod evaluator;
pub mod publish;
pub mod settings;
pub mod storage;
pub mod timestamp;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use evaluator::{
    AssetProbe, EligiblePresentation, FsAssetProbe, Ineligible, ScaleIn, evaluate,
    evaluate_metadata, evaluate_with,
};
pub use publish::{AssetLocator, DirAssetLocator, Publisher, select_by_weight, validate_config};
pub use settings::{load_settings, load_settings_from, open_storage, save_settings};
pub use storage::{FileStore, MemoryStore, MetadataStore, SplashStorage};
pub use timestamp::parse_instant;
