//! Pure construction of outgoing requests.
//!
//! [`DescriptorBuilder`] turns an operation and its parameters into a
//! [`RequestDescriptor`] without touching the network, so every request can
//! be inspected before it is sent.

use crate::{
    Choice, CreateGroupParams, Cursor, GroupStat, ListGroupsParams, ListReplaysParams,
    PatchGroupParams, PatchReplayParams, QueryEncoder, Visibility, WireValue,
    params::validate_count,
};
use ballchasing_error::{
    BallchasingResult, ConfigError, JsonError, ValidationError, ValidationErrorKind,
};
use ballchasing_rate_limit::Operation;
use reqwest::{
    Method, Url,
    header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue},
    multipart::{Form, Part},
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, trace};

/// Replay payload for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayFile {
    file_name: String,
    bytes: Vec<u8>,
}

impl ReplayFile {
    /// Wrap replay bytes under the given file name.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a replay from disk, keeping its file name.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> BallchasingResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ConfigError::new(format!("Failed to read replay {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "replay.replay".to_string());
        Ok(Self::new(file_name, bytes))
    }

    /// File name sent in the multipart part.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Raw replay bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Payload of a request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// JSON object containing only provided fields
    Json(serde_json::Value),
    /// Multipart form with a single `file` field
    Multipart(ReplayFile),
}

/// A fully built request, ready to hand to a transport.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct RequestDescriptor {
    operation: Operation,
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: RequestBody,
}

impl RequestDescriptor {
    /// Convert into a transport request on `transport`.
    pub fn into_request(self, transport: &reqwest::Client) -> reqwest::RequestBuilder {
        let request = transport
            .request(self.method, self.url)
            .headers(self.headers);
        match self.body {
            RequestBody::Empty => request,
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(file) => {
                let part = Part::bytes(file.bytes).file_name(file.file_name);
                request.multipart(Form::new().part("file", part))
            }
        }
    }
}

/// Builds request descriptors for one API token and base URL.
///
/// # Examples
///
/// ```
/// use ballchasing::DescriptorBuilder;
///
/// let builder = DescriptorBuilder::new("https://ballchasing.com", "T").unwrap();
/// let ping = builder.ping().unwrap();
/// assert_eq!(ping.url().as_str(), "https://ballchasing.com/api");
/// assert_eq!(ping.headers()["authorization"], "T");
/// ```
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    base: Url,
    token: HeaderValue,
}

impl DescriptorBuilder {
    /// Builder for `base_url` authenticating with `token`.
    ///
    /// # Errors
    ///
    /// Fails when the base URL does not parse or cannot carry a path, or when
    /// the token is not a legal header value.
    pub fn new(base_url: &str, token: &str) -> BallchasingResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ConfigError::new(format!("Invalid base URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::new(format!("Base URL {} cannot carry a path", base_url)).into());
        }
        let mut token = HeaderValue::from_str(token)
            .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidHeader("Authorization")))?;
        token.set_sensitive(true);
        Ok(Self { base, token })
    }

    /// Base URL every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> BallchasingResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::new(format!("Base URL {} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.token.clone());
        headers
    }

    fn with_cookie(cookie: Option<&str>) -> BallchasingResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            let mut value = HeaderValue::from_str(cookie)
                .map_err(|_| ValidationError::new(ValidationErrorKind::InvalidHeader("Cookie")))?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }
        Ok(headers)
    }

    fn descriptor(
        operation: Operation,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: RequestBody,
    ) -> RequestDescriptor {
        debug!(operation = %operation, method = %method, url = %url, "Built request");
        RequestDescriptor {
            operation,
            method,
            url,
            headers,
            body,
        }
    }

    fn json_body<T: Serialize>(payload: &T) -> BallchasingResult<RequestBody> {
        let value = serde_json::to_value(payload)
            .map_err(|e| JsonError::new(format!("Failed to encode request body: {}", e)))?;
        Ok(RequestBody::Json(value))
    }

    /// Resolve a list endpoint, letting a cursor replace everything else.
    fn listing(
        &self,
        collection: &'static str,
        next: Option<&Cursor>,
        count: Option<u32>,
        query: impl FnOnce() -> QueryEncoder,
    ) -> BallchasingResult<Url> {
        validate_count(count)?;
        if let Some(next) = next {
            next.validate()?;
            trace!(cursor = %next, "Following continuation cursor");
            return Url::parse(next.as_str()).map_err(|_| {
                ValidationError::new(ValidationErrorKind::InvalidCursor(next.to_string())).into()
            });
        }
        let mut url = self.endpoint(&["api", collection])?;
        query().apply(&mut url);
        Ok(url)
    }

    /// `GET /api`
    pub fn ping(&self) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api"])?;
        Ok(Self::descriptor(
            Operation::Ping,
            Method::GET,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `POST /api/v2/upload`
    pub fn upload_replay(
        &self,
        file: ReplayFile,
        visibility: impl Into<Choice<Visibility>>,
        group: Option<&str>,
    ) -> BallchasingResult<RequestDescriptor> {
        let mut url = self.endpoint(&["api", "v2", "upload"])?;
        let visibility = visibility.into();
        let mut query = QueryEncoder::new();
        query
            .field("visibility", Some(&visibility))
            .field("group", group);
        query.apply(&mut url);
        Ok(Self::descriptor(
            Operation::UploadReplay,
            Method::POST,
            url,
            self.authorized(),
            RequestBody::Multipart(file),
        ))
    }

    /// `GET /api/replays`, or the cursor URL when `params.next` is set.
    ///
    /// The cursor is sent as its normalized [`Url`]; see [`Cursor`].
    ///
    /// # Errors
    ///
    /// Rejects a `count` outside 1..=200 and a cursor that is not an
    /// absolute http(s) URL.
    pub fn list_replays(&self, params: &ListReplaysParams) -> BallchasingResult<RequestDescriptor> {
        let url = self.listing("replays", params.next.as_ref(), params.count, || {
            params.encode()
        })?;
        Ok(Self::descriptor(
            Operation::ListReplays,
            Method::GET,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `GET /api/replays/{id}`
    pub fn get_replay(&self, replay_id: &str) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "replays", identifier("replay_id", replay_id)?])?;
        Ok(Self::descriptor(
            Operation::GetReplay,
            Method::GET,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `DELETE /api/replays/{id}`
    pub fn delete_replay(&self, replay_id: &str) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "replays", identifier("replay_id", replay_id)?])?;
        Ok(Self::descriptor(
            Operation::DeleteReplay,
            Method::DELETE,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `PATCH /api/replays/{id}`
    pub fn patch_replay(
        &self,
        replay_id: &str,
        params: &PatchReplayParams,
    ) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "replays", identifier("replay_id", replay_id)?])?;
        Ok(Self::descriptor(
            Operation::PatchReplay,
            Method::PATCH,
            url,
            self.authorized(),
            Self::json_body(params)?,
        ))
    }

    /// `GET /api/replays/{id}/file`
    pub fn download_replay(&self, replay_id: &str) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&[
            "api",
            "replays",
            identifier("replay_id", replay_id)?,
            "file",
        ])?;
        Ok(Self::descriptor(
            Operation::DownloadReplay,
            Method::GET,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `POST /api/groups`
    pub fn create_group(&self, params: &CreateGroupParams) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "groups"])?;
        Ok(Self::descriptor(
            Operation::CreateGroup,
            Method::POST,
            url,
            self.authorized(),
            Self::json_body(params)?,
        ))
    }

    /// `GET /api/groups`, or the cursor URL when `params.next` is set.
    ///
    /// # Errors
    ///
    /// Same rules as [`DescriptorBuilder::list_replays`].
    pub fn list_groups(&self, params: &ListGroupsParams) -> BallchasingResult<RequestDescriptor> {
        let url = self.listing("groups", params.next.as_ref(), params.count, || {
            params.encode()
        })?;
        Ok(Self::descriptor(
            Operation::ListGroups,
            Method::GET,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `GET /api/groups/{id}`
    pub fn get_group(&self, group_id: &str) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "groups", identifier("group_id", group_id)?])?;
        Ok(Self::descriptor(
            Operation::GetGroup,
            Method::GET,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `DELETE /api/groups/{id}`
    pub fn delete_group(&self, group_id: &str) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "groups", identifier("group_id", group_id)?])?;
        Ok(Self::descriptor(
            Operation::DeleteGroup,
            Method::DELETE,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `PATCH /api/groups/{id}`
    pub fn patch_group(
        &self,
        group_id: &str,
        params: &PatchGroupParams,
    ) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "groups", identifier("group_id", group_id)?])?;
        Ok(Self::descriptor(
            Operation::PatchGroup,
            Method::PATCH,
            url,
            self.authorized(),
            Self::json_body(params)?,
        ))
    }

    /// `GET /api/maps`
    pub fn maps(&self) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&["api", "maps"])?;
        Ok(Self::descriptor(
            Operation::Maps,
            Method::GET,
            url,
            self.authorized(),
            RequestBody::Empty,
        ))
    }

    /// `GET /dyn/replay/{id}/threejs`. Sends a cookie instead of the token.
    pub fn get_threejs(
        &self,
        replay_id: &str,
        cookie: Option<&str>,
    ) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&[
            "dyn",
            "replay",
            identifier("replay_id", replay_id)?,
            "threejs",
        ])?;
        Ok(Self::descriptor(
            Operation::GetThreejs,
            Method::GET,
            url,
            Self::with_cookie(cookie)?,
            RequestBody::Empty,
        ))
    }

    /// `GET /dyn/replay/{id}/timeline`. Sends a cookie instead of the token.
    pub fn get_timeline(
        &self,
        replay_id: &str,
        cookie: Option<&str>,
    ) -> BallchasingResult<RequestDescriptor> {
        let url = self.endpoint(&[
            "dyn",
            "replay",
            identifier("replay_id", replay_id)?,
            "timeline",
        ])?;
        Ok(Self::descriptor(
            Operation::GetTimeline,
            Method::GET,
            url,
            Self::with_cookie(cookie)?,
            RequestBody::Empty,
        ))
    }

    /// `GET /dl/stats/group-{stat}/{id}/{id}-{stat}.csv`
    pub fn export_csv(
        &self,
        group_id: &str,
        stat: impl Into<Choice<GroupStat>>,
        cookie: Option<&str>,
    ) -> BallchasingResult<RequestDescriptor> {
        let group_id = identifier("group_id", group_id)?;
        let stat = stat.into();
        let section = format!("group-{}", stat.wire());
        let file_name = format!("{}-{}.csv", group_id, stat.wire());
        let url = self.endpoint(&["dl", "stats", section.as_str(), group_id, file_name.as_str()])?;
        Ok(Self::descriptor(
            Operation::ExportCsv,
            Method::GET,
            url,
            Self::with_cookie(cookie)?,
            RequestBody::Empty,
        ))
    }
}

fn identifier<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::new(ValidationErrorKind::EmptyIdentifier(field)))
    } else {
        Ok(value)
    }
}
