//! Bicep parsing errors.

use std::path::PathBuf;

/// Error returned when a manifest cannot be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum BicepError {
    /// Manifest file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid token (unterminated string or comment, stray character).
    #[error("line {line}: {message}")]
    Lex { line: u32, message: String },
    /// Token sequence does not form a valid statement.
    #[error("line {line}: {message}")]
    Parse { line: u32, message: String },
}
