//! Continuation cursors for list endpoints.
//!
//! A list response carries a `next` URL. Passing it back as the cursor of
//! the same operation fetches the following page; every other filter given
//! alongside it is dropped.

use crate::Response;
use ballchasing_error::{ValidationError, ValidationErrorKind};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Opaque continuation URL taken verbatim from a list response.
///
/// The string is kept exactly as received. When sent it is parsed into a
/// [`Url`], which normalizes it: the host is lowercased, a default port is
/// dropped and unsafe characters are percent-encoded. Cursors issued by the
/// server are already in that form and go out byte-for-byte unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a continuation URL.
    pub fn new(next: impl Into<String>) -> Self {
        Self(next.into())
    }

    /// The URL exactly as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cursor for the page after `response`, if there is one.
    ///
    /// An absent, null or empty `next` field means the listing is complete.
    pub fn from_response(response: &Response) -> Option<Self> {
        let body: serde_json::Value = serde_json::from_slice(response.bytes()).ok()?;
        body.get("next")
            .and_then(serde_json::Value::as_str)
            .filter(|next| !next.is_empty())
            .map(Cursor::new)
    }

    /// Check the cursor is an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrorKind::InvalidCursor`] otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = || ValidationError::new(ValidationErrorKind::InvalidCursor(self.0.clone()));
        let url = Url::parse(&self.0).map_err(|_| invalid())?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            _ => Err(invalid()),
        }
    }
}

impl From<String> for Cursor {
    fn from(next: String) -> Self {
        Self(next)
    }
}

impl From<&str> for Cursor {
    fn from(next: &str) -> Self {
        Self(next.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Cursor::new("https://ballchasing.com/api/replays?after=abc").validate().is_ok());
        assert!(Cursor::new("/api/replays?after=abc").validate().is_err());
        assert!(Cursor::new("ftp://ballchasing.com/x").validate().is_err());
        assert!(Cursor::new("").validate().is_err());
    }
}
