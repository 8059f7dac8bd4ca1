//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, JsonError, RateLimitError, ValidationError};

/// Every failure the client can report.
///
/// HTTP 4xx/5xx responses are deliberately absent: they reach the caller as
/// responses, not errors.
///
/// # Examples
///
/// ```
/// use ballchasing_error::{BallchasingError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: BallchasingError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BallchasingErrorKind {
    /// Transport failure
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Argument rejected before sending
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Rate budget construction error
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
}

/// Ballchasing error with kind discrimination.
///
/// # Examples
///
/// ```
/// use ballchasing_error::{BallchasingResult, ConfigError};
///
/// fn might_fail() -> BallchasingResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Ballchasing Error: {}", _0)]
pub struct BallchasingError(Box<BallchasingErrorKind>);

impl BallchasingError {
    /// Create a new error from a kind.
    pub fn new(kind: BallchasingErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BallchasingErrorKind {
        &self.0
    }

    /// True when the error is a local argument rejection.
    pub fn is_validation(&self) -> bool {
        matches!(*self.0, BallchasingErrorKind::Validation(_))
    }

    /// True when the error came from the transport.
    pub fn is_transport(&self) -> bool {
        matches!(*self.0, BallchasingErrorKind::Http(_))
    }
}

// Generic From implementation for any type that converts to BallchasingErrorKind
impl<T> From<T> for BallchasingError
where
    T: Into<BallchasingErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for ballchasing operations.
pub type BallchasingResult<T> = std::result::Result<T, BallchasingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationErrorKind;

    #[test]
    fn test_validation_error_converts_and_classifies() {
        let err: BallchasingError = ValidationError::new(ValidationErrorKind::CountOutOfRange {
            field: "count",
            value: 0,
            min: 1,
            max: 200,
        })
        .into();
        assert!(err.is_validation());
        assert!(!err.is_transport());
        assert!(err.to_string().contains("between 1 and 200"));
    }

    #[test]
    fn test_location_is_captured() {
        let err = HttpError::new("boom");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.line > 0);
    }
}
