//! CLI error types.

use std::path::PathBuf;

use appgraph_bicep::BicepError;
use appgraph_config::ConfigError;
use appgraph_diagrams::KrokiError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Bicep(#[from] BicepError),

    #[error("Kroki rendering failed: {0}")]
    Kroki(#[from] KrokiError),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    MissingInput(String),
}
