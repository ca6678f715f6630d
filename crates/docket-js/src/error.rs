use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for front-end operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Error variants for reading and parsing source files.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read a source file.
    #[error("failed to read source '{path}': {source}")]
    Io {
        /// Path to the source file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The parser rejected the source.
    #[error("failed to parse source '{path}': {}", diagnostics.join("; "))]
    Parse {
        /// Path to the source file.
        path: PathBuf,
        /// Parser diagnostics, one per error.
        diagnostics: Vec<String>,
    },
}
