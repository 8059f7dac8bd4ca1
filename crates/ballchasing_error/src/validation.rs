//! Local argument validation errors.
//!
//! These are raised before any request leaves the process.

/// Reasons an argument is rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum ValidationErrorKind {
    /// Page-size style parameter outside its inclusive range.
    #[display("\"{field}\" must be between {min} and {max}, got {value}")]
    CountOutOfRange {
        /// Parameter name
        field: &'static str,
        /// Rejected value
        value: i64,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
    },

    /// Continuation cursor that is not an absolute URL.
    #[display("Invalid continuation cursor: {_0}")]
    InvalidCursor(String),

    /// Path identifier (replay or group id) that is empty.
    #[display("Empty identifier for {_0}")]
    EmptyIdentifier(&'static str),

    /// Header value containing bytes HTTP does not allow.
    #[display("Invalid value for header {_0}")]
    InvalidHeader(&'static str),
}

/// Validation error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The error kind
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use ballchasing_error::{ValidationError, ValidationErrorKind};
    ///
    /// let err = ValidationError::new(ValidationErrorKind::EmptyIdentifier("replay"));
    /// assert!(err.to_string().contains("replay"));
    /// ```
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
