//! Classification of HTTP outcomes and the observer that reports them.
//!
//! Error statuses never become `Err` values. They are described by a
//! [`Diagnostic`] handed to a [`DiagnosticObserver`], and the response is
//! still returned to the caller.

use std::fmt;
use tracing::warn;

/// Coarse outcome of a status code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    serde::Serialize,
)]
pub enum StatusClass {
    /// Anything outside 400..=599
    #[strum(serialize = "none")]
    None,
    /// 400..=499
    #[strum(serialize = "Client Error")]
    ClientError,
    /// 500..=599
    #[strum(serialize = "Server Error")]
    ServerError,
}

impl StatusClass {
    /// True for client and server errors.
    pub fn is_error(self) -> bool {
        !matches!(self, StatusClass::None)
    }
}

/// Classify a status code. Depends on nothing but the code.
///
/// ```
/// use ballchasing::{classify, StatusClass};
///
/// assert_eq!(classify(404), StatusClass::ClientError);
/// assert_eq!(classify(503), StatusClass::ServerError);
/// assert_eq!(classify(200), StatusClass::None);
/// ```
pub fn classify(status: u16) -> StatusClass {
    match status {
        400..=499 => StatusClass::ClientError,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::None,
    }
}

/// Decode a reason phrase as UTF-8, falling back to Latin-1.
///
/// Latin-1 maps every byte to the code point of the same value, so the
/// fallback cannot fail.
pub fn decode_reason(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => raw.iter().map(|&byte| char::from(byte)).collect(),
    }
}

/// The `error` field of a JSON error body, if there is one.
///
/// Bodies that are not JSON, not objects or lack the field yield `None`.
pub fn error_description(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("error")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Structured description of an HTTP error response.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, serde::Serialize)]
pub struct Diagnostic {
    status: u16,
    class: StatusClass,
    reason: String,
    description: Option<String>,
    url: String,
}

impl Diagnostic {
    /// Describe a response. Returns `None` when the status is not an error.
    pub fn new(status: u16, reason: &[u8], body: &[u8], url: impl Into<String>) -> Option<Self> {
        let class = classify(status);
        if !class.is_error() {
            return None;
        }
        Some(Self {
            status,
            class,
            reason: decode_reason(reason),
            description: error_description(body),
            url: url.into(),
        })
    }
}

/// `404 Client Error: Not Found (replay not found) for url: https://...`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status, self.class, self.reason)?;
        if let Some(description) = &self.description {
            write!(f, " ({})", description)?;
        }
        write!(f, " for url: {}", self.url)
    }
}

/// Receives a diagnostic for every error response a session sees.
pub trait DiagnosticObserver: Send + Sync {
    /// Called once per error response, before the response is returned.
    fn observe(&self, diagnostic: &Diagnostic);
}

/// Logs each diagnostic as a `warn!` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DiagnosticObserver for TracingObserver {
    fn observe(&self, diagnostic: &Diagnostic) {
        warn!(
            status = diagnostic.status,
            class = %diagnostic.class,
            reason = %diagnostic.reason,
            description = diagnostic.description.as_deref(),
            url = %diagnostic.url,
            "{}",
            diagnostic
        );
    }
}

impl<F> DiagnosticObserver for F
where
    F: Fn(&Diagnostic) + Send + Sync,
{
    fn observe(&self, diagnostic: &Diagnostic) {
        self(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(399), StatusClass::None);
        assert_eq!(classify(400), StatusClass::ClientError);
        assert_eq!(classify(499), StatusClass::ClientError);
        assert_eq!(classify(500), StatusClass::ServerError);
        assert_eq!(classify(599), StatusClass::ServerError);
        assert_eq!(classify(600), StatusClass::None);
    }

    #[test]
    fn test_reason_latin1_fallback() {
        assert_eq!(decode_reason(b"Not Found"), "Not Found");
        assert_eq!(decode_reason(&[0x43, 0x61, 0x66, 0xe9]), "Caf\u{e9}");
    }

    #[test]
    fn test_description_never_fails() {
        assert_eq!(error_description(br#"{"error":"bad id"}"#), Some("bad id".into()));
        assert_eq!(error_description(br#"{"error":null}"#), None);
        assert_eq!(error_description(br#"{"message":"x"}"#), None);
        assert_eq!(error_description(b"<html>oops</html>"), None);
        assert_eq!(error_description(b"[1,2]"), None);
        assert_eq!(error_description(b""), None);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            404,
            b"Not Found",
            br#"{"error":"replay not found"}"#,
            "https://ballchasing.com/api/replays/x",
        )
        .unwrap();
        assert_eq!(
            diagnostic.to_string(),
            "404 Client Error: Not Found (replay not found) for url: https://ballchasing.com/api/replays/x"
        );
    }

    #[test]
    fn test_success_has_no_diagnostic() {
        assert!(Diagnostic::new(200, b"OK", b"{}", "u").is_none());
    }
}
