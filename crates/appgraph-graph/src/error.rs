//! Graph parsing errors.

use std::path::PathBuf;

/// Error returned when graph output cannot be read or decoded.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Graph file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Output is not a valid graph document.
    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}
