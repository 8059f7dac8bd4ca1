//! Async client for the [ballchasing.com](https://ballchasing.com) replay API.
//!
//! A [`Client`] holds the API token and, optionally, one rate tracker per
//! metered operation sized for the token holder's Patreon tier. Sessions
//! created from it send requests and return buffered [`Response`]s. HTTP
//! error statuses are returned like any other response and reported to a
//! [`DiagnosticObserver`]; only argument validation and transport failures
//! produce errors.
//!
//! ```no_run
//! use ballchasing::{ClientConfigBuilder, Client, ListReplaysParams, PatreonTier, Playlist};
//!
//! # async fn run() -> ballchasing::BallchasingResult<()> {
//! let config = ClientConfigBuilder::default()
//!     .token("your-token")
//!     .tier(PatreonTier::Gold)
//!     .build()?;
//! let session = Client::new(config)?.session_default();
//!
//! let mut params = ListReplaysParams::default()
//!     .playlists([Playlist::RankedDoubles])
//!     .count(50u32);
//! loop {
//!     let page = session.list_replays(&params).await?;
//!     match page.next_cursor() {
//!         Some(next) => params = ListReplaysParams::default().next(next),
//!         None => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod diagnostic;
mod encoder;
pub mod observability;
mod pagination;
mod params;
mod request;
mod response;
mod session;
mod wire;

pub use client::{Client, ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL, TierSelection};
pub use diagnostic::{
    Diagnostic, DiagnosticObserver, StatusClass, TracingObserver, classify, decode_reason,
    error_description,
};
pub use encoder::QueryEncoder;
pub use pagination::Cursor;
pub use params::{
    CreateGroupParams, ListGroupsParams, ListReplaysParams, MAX_COUNT, MIN_COUNT,
    PatchGroupParams, PatchReplayParams, PlayerId,
};
pub use request::{DescriptorBuilder, ReplayFile, RequestBody, RequestDescriptor};
pub use response::Response;
pub use session::Session;
pub use wire::{
    Choice, DateFilter, GroupSortBy, GroupStat, Map, MatchResult, Platform, PlayerIdentification,
    Playlist, Rank, ReplaySortBy, Season, SortDirection, TeamIdentification, Uploader,
    Visibility, WireValue,
};

pub use ballchasing_error::{BallchasingError, BallchasingErrorKind, BallchasingResult};
pub use ballchasing_rate_limit::{
    GateOptions, Operation, OperationBudget, PatreonTier, RateGate, RateLimitConfig, Tier,
    TierConfig,
};
