//! Error types for configuration loading.

use docket_core::DocsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found")]
    NotFound,

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },

    #[error("invalid warning rule: {source}")]
    InvalidWarningRule {
        #[source]
        source: DocsError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
