//! Local file store error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or writing exported JSON files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file the importer expects has not been exported.
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),

    /// I/O failure on a specific path.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON, or a value could not be serialized.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
