//! Parameter sets for the filtering and mutating operations.
//!
//! Every optional field is an `Option`; `None` is never sent. Setters wrap
//! their argument in `Some`, so `ListReplaysParams::default().pro(false)`
//! sends `pro=false` while the default sends nothing.

use crate::{
    Choice, Cursor, DateFilter, GroupSortBy, Map, MatchResult, Platform, PlayerIdentification,
    Playlist, QueryEncoder, Rank, ReplaySortBy, Season, SortDirection, TeamIdentification,
    Uploader, Visibility, WireValue,
};
use ballchasing_error::{ValidationError, ValidationErrorKind};
use serde::Serialize;
use std::borrow::Cow;

/// Smallest accepted page size.
pub const MIN_COUNT: u32 = 1;
/// Largest accepted page size.
pub const MAX_COUNT: u32 = 200;

/// Reject a provided page size outside `MIN_COUNT..=MAX_COUNT`.
pub(crate) fn validate_count(count: Option<u32>) -> Result<(), ValidationError> {
    match count {
        Some(value) if !(MIN_COUNT..=MAX_COUNT).contains(&value) => Err(ValidationError::new(
            ValidationErrorKind::CountOutOfRange {
                field: "count",
                value: i64::from(value),
                min: i64::from(MIN_COUNT),
                max: i64::from(MAX_COUNT),
            },
        )),
        _ => Ok(()),
    }
}

/// Player filter by platform account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerId {
    /// Account platform
    pub platform: Choice<Platform>,
    /// Platform-specific id
    pub id: String,
}

impl PlayerId {
    /// Player on `platform` with account `id`.
    pub fn new(platform: impl Into<Choice<Platform>>, id: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            id: id.into(),
        }
    }
}

/// Sent as `platform:id`.
impl WireValue for PlayerId {
    fn wire(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{}:{}", self.platform.wire(), self.id))
    }
}

/// Filters for `GET /api/replays`.
///
/// # Examples
///
/// ```
/// use ballchasing::{ListReplaysParams, Playlist, Uploader};
///
/// let params = ListReplaysParams::default()
///     .uploader(Uploader::Me)
///     .count(5u32)
///     .pro(true)
///     .playlists([Playlist::RankedDoubles]);
/// assert_eq!(params.count, Some(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, derive_setters::Setters)]
#[setters(strip_option, into)]
pub struct ListReplaysParams {
    /// Continuation cursor; when set every other field is ignored
    pub next: Option<Cursor>,
    /// Exact replay title
    pub title: Option<String>,
    /// Players by display name, one `player-name` per entry
    #[setters(skip)]
    pub player_names: Vec<String>,
    /// Players by platform id, one `player-id` per entry
    #[setters(skip)]
    pub player_ids: Vec<PlayerId>,
    /// Playlists, one `playlist` per entry
    #[setters(skip)]
    pub playlists: Vec<Choice<Playlist>>,
    /// Season played
    pub season: Option<Choice<Season>>,
    /// Win or loss for the uploader
    pub match_result: Option<Choice<MatchResult>>,
    /// Lowest rank of every player
    pub min_rank: Option<Choice<Rank>>,
    /// Highest rank of every player
    pub max_rank: Option<Choice<Rank>>,
    /// At least one pro player in the lobby
    pub pro: Option<bool>,
    /// `me` or a Steam id
    pub uploader: Option<Choice<Uploader>>,
    /// Direct parent group id
    pub group: Option<String>,
    /// Arena
    pub map: Option<Choice<Map>>,
    /// Uploaded before
    pub created_before: Option<DateFilter>,
    /// Uploaded after
    pub created_after: Option<DateFilter>,
    /// Played before
    pub replay_date_before: Option<DateFilter>,
    /// Played after
    pub replay_date_after: Option<DateFilter>,
    /// Page size, 1 to 200
    pub count: Option<u32>,
    /// Sort key
    pub sort_by: Option<Choice<ReplaySortBy>>,
    /// Sort direction
    pub sort_dir: Option<Choice<SortDirection>>,
}

impl ListReplaysParams {
    /// Filter by player display names.
    pub fn player_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Filter by platform account ids.
    pub fn player_ids(mut self, ids: impl IntoIterator<Item = PlayerId>) -> Self {
        self.player_ids = ids.into_iter().collect();
        self
    }

    /// Filter by playlists.
    pub fn playlists<I, P>(mut self, playlists: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Choice<Playlist>>,
    {
        self.playlists = playlists.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn encode(&self) -> QueryEncoder {
        let mut query = QueryEncoder::new();
        query
            .field("title", self.title.as_ref())
            .field("season", self.season.as_ref())
            .field("match-result", self.match_result.as_ref())
            .field("min-rank", self.min_rank.as_ref())
            .field("max-rank", self.max_rank.as_ref())
            .field("pro", self.pro.as_ref())
            .field("uploader", self.uploader.as_ref())
            .field("group", self.group.as_ref())
            .field("map", self.map.as_ref())
            .field("created-before", self.created_before.as_ref())
            .field("created-after", self.created_after.as_ref())
            .field("replay-date-before", self.replay_date_before.as_ref())
            .field("replay-date-after", self.replay_date_after.as_ref())
            .field("count", self.count.as_ref())
            .field("sort-by", self.sort_by.as_ref())
            .field("sort-dir", self.sort_dir.as_ref())
            .repeated("player-name", &self.player_names)
            .repeated("player-id", &self.player_ids)
            .repeated("playlist", &self.playlists);
        query
    }
}

/// Filters for `GET /api/groups`.
#[derive(Debug, Clone, Default, PartialEq, derive_setters::Setters)]
#[setters(strip_option, into)]
pub struct ListGroupsParams {
    /// Continuation cursor; when set every other field is ignored
    pub next: Option<Cursor>,
    /// Substring of the group name
    pub name: Option<String>,
    /// Creator Steam id
    pub creator: Option<String>,
    /// Direct or indirect parent group id
    pub group: Option<String>,
    /// Created before
    pub created_before: Option<DateFilter>,
    /// Created after
    pub created_after: Option<DateFilter>,
    /// Page size, 1 to 200
    pub count: Option<u32>,
    /// Sort key
    pub sort_by: Option<Choice<GroupSortBy>>,
    /// Sort direction
    pub sort_dir: Option<Choice<SortDirection>>,
}

impl ListGroupsParams {
    pub(crate) fn encode(&self) -> QueryEncoder {
        let mut query = QueryEncoder::new();
        query
            .field("name", self.name.as_ref())
            .field("creator", self.creator.as_ref())
            .field("group", self.group.as_ref())
            .field("created-before", self.created_before.as_ref())
            .field("created-after", self.created_after.as_ref())
            .field("count", self.count.as_ref())
            .field("sort-by", self.sort_by.as_ref())
            .field("sort-dir", self.sort_dir.as_ref());
        query
    }
}

/// Body of `PATCH /api/replays/{id}`.
///
/// `group("")` removes the replay from its group; leaving `group` unset
/// keeps it where it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, derive_setters::Setters)]
#[setters(strip_option, into)]
pub struct PatchReplayParams {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Choice<Visibility>>,
    /// New parent group, or `""` for none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Body of `POST /api/groups`.
#[derive(Debug, Clone, PartialEq, Serialize, derive_setters::Setters)]
#[setters(strip_option, into)]
pub struct CreateGroupParams {
    /// Group name
    #[setters(skip)]
    pub name: String,
    /// Player matching strategy
    #[setters(skip)]
    pub player_identification: Choice<PlayerIdentification>,
    /// Team matching strategy
    #[setters(skip)]
    pub team_identification: Choice<TeamIdentification>,
    /// Parent group id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl CreateGroupParams {
    /// Group with the required fields set and no parent.
    pub fn new(
        name: impl Into<String>,
        player_identification: impl Into<Choice<PlayerIdentification>>,
        team_identification: impl Into<Choice<TeamIdentification>>,
    ) -> Self {
        Self {
            name: name.into(),
            player_identification: player_identification.into(),
            team_identification: team_identification.into(),
            parent: None,
        }
    }
}

/// Body of `PATCH /api/groups/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, derive_setters::Setters)]
#[setters(strip_option, into)]
pub struct PatchGroupParams {
    /// Player matching strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_identification: Option<Choice<PlayerIdentification>>,
    /// Team matching strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_identification: Option<Choice<TeamIdentification>>,
    /// Parent group id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Link sharing overrides child visibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
}
