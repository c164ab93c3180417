use std::path::PathBuf;

/// Result type for splash-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by storage, settings and publishing.
///
/// Eligibility failures are not errors; see [`crate::evaluator::Ineligible`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed storage file {path:?}: {source}")]
    StorageFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] confy::ConfyError),

    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Invalid splash config: {0}")]
    InvalidConfig(String),

    #[error("Invalid scale animation: {0}")]
    InvalidScale(String),

    #[error("Config list is empty")]
    EmptyConfigList,

    #[error("No config within time window")]
    NoEligibleConfig,

    #[error("Asset for '{0}' is not available locally")]
    AssetUnavailable(String),
}
