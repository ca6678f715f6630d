use thiserror::Error;

/// Result type alias for aggregation operations.
pub type Result<T> = std::result::Result<T, DocsError>;

/// Error variants raised by the aggregation engine.
///
/// Most problems found in documentation are reported as warnings; only the
/// conditions below abort a run.
#[derive(Debug, Error)]
pub enum DocsError {
    /// A class reaches itself through its `extends` or `mixins` chain.
    #[error("circular inheritance: {}", chain.join(" -> "))]
    CircularInheritance {
        /// Class names along the cycle, starting and ending with the same class.
        chain: Vec<String>,
    },

    /// Warnings were reported while they are configured to be fatal.
    #[error("{count} warning(s) reported while warnings are treated as errors")]
    Warnings {
        /// Number of collected warnings.
        count: usize,
    },

    /// A registry operation referenced a class that is not registered.
    #[error("unknown class '{name}'")]
    UnknownClass {
        /// Requested class name.
        name: String,
    },

    /// A warning rule string could not be parsed.
    #[error("invalid warning rule '{rule}': {reason}")]
    InvalidWarningRule {
        /// The offending rule text.
        rule: String,
        /// Why the rule was rejected.
        reason: String,
    },
}
