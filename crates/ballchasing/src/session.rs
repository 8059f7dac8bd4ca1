//! Dispatch of API operations over a transport.

use crate::{
    Choice, CreateGroupParams, DescriptorBuilder, DiagnosticObserver, GroupStat,
    ListGroupsParams, ListReplaysParams, PatchGroupParams, PatchReplayParams, ReplayFile,
    RequestDescriptor, Response, TracingObserver, Visibility,
};
use ballchasing_error::{BallchasingResult, HttpError};
use ballchasing_rate_limit::RateGate;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Sends requests for one [`Client`](crate::Client).
///
/// Every operation builds its request, waits on the operation's rate
/// tracker if it has one, sends, and returns the buffered [`Response`].
/// Error statuses are returned as responses and reported to the observer;
/// only local validation and transport failures are `Err`.
#[derive(Clone)]
pub struct Session {
    transport: reqwest::Client,
    descriptors: DescriptorBuilder,
    gate: RateGate,
    observer: Option<Arc<dyn DiagnosticObserver>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.descriptors.base_url().as_str())
            .field("gated_operations", &self.gate.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Session {
    pub(crate) fn new(
        transport: reqwest::Client,
        descriptors: DescriptorBuilder,
        gate: RateGate,
        report_errors: bool,
    ) -> Self {
        let observer: Option<Arc<dyn DiagnosticObserver>> = if report_errors {
            Some(Arc::new(TracingObserver))
        } else {
            None
        };
        Self {
            transport,
            descriptors,
            gate,
            observer,
        }
    }

    /// Report error responses to `observer` instead.
    pub fn with_observer(mut self, observer: impl DiagnosticObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Stop reporting error responses.
    pub fn quiet(mut self) -> Self {
        self.observer = None;
        self
    }

    /// Request construction without sending.
    pub fn descriptors(&self) -> &DescriptorBuilder {
        &self.descriptors
    }

    /// Rate trackers shared with the owning client.
    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Wait, send and classify one built request.
    async fn dispatch(&self, descriptor: RequestDescriptor) -> BallchasingResult<Response> {
        let operation = *descriptor.operation();
        self.gate.acquire(operation).await;

        debug!(%operation, url = %descriptor.url(), "Sending request");
        let response = descriptor
            .into_request(&self.transport)
            .send()
            .await
            .map_err(|e| {
                error!(%operation, "Request failed: {}", e);
                HttpError::new(format!("Request failed: {}", e))
            })?;

        let response = Response::from_reqwest(response).await?;
        debug!(%operation, status = response.status().as_u16(), "Received response");

        if let Some(observer) = &self.observer {
            if let Some(diagnostic) = response.diagnostic() {
                observer.observe(&diagnostic);
            }
        }
        Ok(response)
    }

    /// Check the API is reachable and the token is valid.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.ping()?).await
    }

    /// Upload a replay file.
    #[instrument(skip(self, file, visibility), fields(file_name = file.file_name()))]
    pub async fn upload_replay(
        &self,
        file: ReplayFile,
        visibility: impl Into<Choice<Visibility>>,
        group: Option<&str>,
    ) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.upload_replay(file, visibility, group)?)
            .await
    }

    /// Filter and list replays, or follow a cursor.
    ///
    /// # Errors
    ///
    /// A `count` outside 1..=200 is rejected before anything is sent.
    #[instrument(skip(self, params))]
    pub async fn list_replays(&self, params: &ListReplaysParams) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.list_replays(params)?).await
    }

    /// Fetch one replay's details.
    #[instrument(skip(self))]
    pub async fn get_replay(&self, replay_id: &str) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.get_replay(replay_id)?).await
    }

    /// Delete a replay owned by the token holder.
    #[instrument(skip(self))]
    pub async fn delete_replay(&self, replay_id: &str) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.delete_replay(replay_id)?)
            .await
    }

    /// Change a replay's title, visibility or group.
    #[instrument(skip(self, params))]
    pub async fn patch_replay(
        &self,
        replay_id: &str,
        params: &PatchReplayParams,
    ) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.patch_replay(replay_id, params)?)
            .await
    }

    /// Download the raw replay file.
    #[instrument(skip(self))]
    pub async fn download_replay(&self, replay_id: &str) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.download_replay(replay_id)?)
            .await
    }

    /// Create a replay group.
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn create_group(&self, params: &CreateGroupParams) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.create_group(params)?).await
    }

    /// Filter and list groups, or follow a cursor.
    ///
    /// # Errors
    ///
    /// A `count` outside 1..=200 is rejected before anything is sent.
    #[instrument(skip(self, params))]
    pub async fn list_groups(&self, params: &ListGroupsParams) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.list_groups(params)?).await
    }

    /// Fetch one group's details.
    #[instrument(skip(self))]
    pub async fn get_group(&self, group_id: &str) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.get_group(group_id)?).await
    }

    /// Delete a group and its subgroups.
    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: &str) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.delete_group(group_id)?).await
    }

    /// Change a group's settings.
    #[instrument(skip(self, params))]
    pub async fn patch_group(
        &self,
        group_id: &str,
        params: &PatchGroupParams,
    ) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.patch_group(group_id, params)?)
            .await
    }

    /// List arenas.
    #[instrument(skip(self))]
    pub async fn maps(&self) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.maps()?).await
    }

    /// Positional frame data used by the site's 3D viewer.
    ///
    /// This endpoint backs the website and may change without notice. A
    /// session cookie grants access to the holder's private replays.
    #[instrument(skip(self, cookie))]
    pub async fn get_threejs(
        &self,
        replay_id: &str,
        cookie: Option<&str>,
    ) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.get_threejs(replay_id, cookie)?)
            .await
    }

    /// Goal and event timeline used by the site.
    ///
    /// Same caveats as [`Session::get_threejs`].
    #[instrument(skip(self, cookie))]
    pub async fn get_timeline(
        &self,
        replay_id: &str,
        cookie: Option<&str>,
    ) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.get_timeline(replay_id, cookie)?)
            .await
    }

    /// Group statistics as CSV.
    #[instrument(skip(self, stat, cookie))]
    pub async fn export_csv(
        &self,
        group_id: &str,
        stat: impl Into<Choice<GroupStat>>,
        cookie: Option<&str>,
    ) -> BallchasingResult<Response> {
        self.dispatch(self.descriptors.export_csv(group_id, stat, cookie)?)
            .await
    }
}
