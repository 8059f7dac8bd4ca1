//! Buffered HTTP response returned by every operation.

use crate::{Cursor, Diagnostic};
use ballchasing_error::{BallchasingResult, HttpError, JsonError};
use reqwest::{StatusCode, Url, header::HeaderMap};
use serde::de::DeserializeOwned;

/// A fully read response.
///
/// The body is buffered so error classification can inspect it while the
/// caller keeps full access. Error statuses are returned here like any
/// other; check [`Response::status`] or [`Response::diagnostic`].
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Assemble a response from its parts.
    pub fn new(status: StatusCode, url: Url, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            url,
            headers,
            body,
        }
    }

    /// Read a transport response to the end.
    ///
    /// # Errors
    ///
    /// A body that cannot be read is a transport failure.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> BallchasingResult<Self> {
        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(format!("Failed to read response body: {}", e)))?;
        Ok(Self::new(status, url, headers, body.to_vec()))
    }

    /// Status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Final URL after redirects.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Consume the response, keeping the body.
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body deserialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns a JSON error when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> BallchasingResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            JsonError::new(format!(
                "Failed to parse response from {} as JSON: {}",
                self.url, e
            ))
            .into()
        })
    }

    /// Diagnostic for 4xx and 5xx responses.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        let reason = self.status.canonical_reason().unwrap_or_default();
        Diagnostic::new(
            self.status.as_u16(),
            reason.as_bytes(),
            &self.body,
            self.url.as_str(),
        )
    }

    /// Cursor for the next page of a list response.
    pub fn next_cursor(&self) -> Option<Cursor> {
        Cursor::from_response(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusClass;

    fn response(status: u16, body: &str) -> Response {
        Response::new(
            StatusCode::from_u16(status).unwrap(),
            Url::parse("https://ballchasing.com/api/replays").unwrap(),
            HeaderMap::new(),
            body.as_bytes().to_vec(),
        )
    }

    #[test]
    fn test_next_cursor() {
        let page = response(200, r#"{"list":[],"next":"https://ballchasing.com/api/replays?after=abc"}"#);
        assert_eq!(
            page.next_cursor().unwrap().as_str(),
            "https://ballchasing.com/api/replays?after=abc"
        );
        assert!(response(200, r#"{"list":[]}"#).next_cursor().is_none());
        assert!(response(200, r#"{"next":""}"#).next_cursor().is_none());
    }

    #[test]
    fn test_error_response_diagnostic() {
        let diagnostic = response(503, "Service Unavailable").diagnostic().unwrap();
        assert_eq!(*diagnostic.class(), StatusClass::ServerError);
        assert_eq!(diagnostic.reason(), "Service Unavailable");
        assert!(diagnostic.description().is_none());
    }

    #[test]
    fn test_json_failure_is_error() {
        let result: BallchasingResult<serde_json::Value> = response(200, "not json").json();
        assert!(result.is_err());
    }
}
