use std::path::PathBuf;

use docket_config::ConfigError;
use docket_core::DocsError;
use docket_js::SourceError;
use thiserror::Error;

/// Result type alias for documentation runs.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a documentation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Docs(#[from] DocsError),

    /// An input path does not exist.
    #[error("input not found: {0}")]
    InputNotFound(PathBuf),

    /// Walking an input directory failed.
    #[error("failed to read directory '{path}': {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The registry could not be serialized.
    #[error("failed to export documentation: {0}")]
    Export(#[from] serde_json::Error),
}
