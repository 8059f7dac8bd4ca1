//! Error types for rate budget construction.

/// Error kinds for rate limiting operations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum RateLimitErrorKind {
    /// Tier name not present in the configuration.
    #[display("Invalid tier: {_0}")]
    InvalidTier(String),
    /// Budget with a zero capacity or zero window.
    #[display("Invalid budget for {operation}: {reason}")]
    InvalidBudget {
        /// Operation whose budget is malformed
        operation: String,
        /// What is wrong with it
        reason: String,
    },
    /// Operation name that does not match any known operation.
    #[display("Unknown operation: {_0}")]
    UnknownOperation(String),
}

/// Rate limiting error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limit Error: {} at line {} in {}", kind, line, file)]
pub struct RateLimitError {
    /// The error kind
    pub kind: RateLimitErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RateLimitError {
    /// Create a new rate limiting error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RateLimitErrorKind {
        &self.kind
    }
}
