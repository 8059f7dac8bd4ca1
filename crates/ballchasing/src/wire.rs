//! Enumerated parameter values and their wire strings.
//!
//! Every enumerable parameter takes a [`Choice`], which is either a known
//! enum value or a literal string sent unchanged. The literal form keeps the
//! client usable when the server grows values this crate does not know yet.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::borrow::Cow;

/// A value with a canonical string form on the wire.
pub trait WireValue {
    /// The exact string sent to the server.
    fn wire(&self) -> Cow<'_, str>;
}

impl<T: WireValue + ?Sized> WireValue for &T {
    fn wire(&self) -> Cow<'_, str> {
        (**self).wire()
    }
}

impl WireValue for str {
    fn wire(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl WireValue for String {
    fn wire(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl WireValue for bool {
    fn wire(&self) -> Cow<'_, str> {
        Cow::Borrowed(if *self { "true" } else { "false" })
    }
}

impl WireValue for u32 {
    fn wire(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

impl WireValue for u64 {
    fn wire(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}

/// RFC 3339 with second precision and a `Z` suffix.
impl WireValue for DateTime<Utc> {
    fn wire(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Either a typed value or a literal passthrough string.
///
/// # Examples
///
/// ```
/// use ballchasing::{Choice, Playlist, WireValue};
///
/// let typed: Choice<Playlist> = Playlist::RankedDoubles.into();
/// let literal: Choice<Playlist> = "some-new-playlist".into();
/// assert_eq!(typed.wire(), "ranked-doubles");
/// assert_eq!(literal.wire(), "some-new-playlist");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Choice<E> {
    /// Known value, resolved through [`WireValue`]
    Value(E),
    /// Sent exactly as given
    Literal(String),
}

impl<E: WireValue> WireValue for Choice<E> {
    fn wire(&self) -> Cow<'_, str> {
        match self {
            Choice::Value(value) => value.wire(),
            Choice::Literal(literal) => Cow::Borrowed(literal),
        }
    }
}

impl<E> From<&str> for Choice<E> {
    fn from(literal: &str) -> Self {
        Choice::Literal(literal.to_string())
    }
}

impl<E> From<String> for Choice<E> {
    fn from(literal: String) -> Self {
        Choice::Literal(literal)
    }
}

impl<E: WireValue> Serialize for Choice<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.wire())
    }
}

impl From<DateTime<Utc>> for Choice<DateTime<Utc>> {
    fn from(value: DateTime<Utc>) -> Self {
        Choice::Value(value)
    }
}

/// Date filter: a UTC timestamp or a preformatted RFC 3339 string.
pub type DateFilter = Choice<DateTime<Utc>>;

macro_rules! wire_enum {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl WireValue for $ty {
                fn wire(&self) -> Cow<'_, str> {
                    Cow::Borrowed(self.as_ref())
                }
            }

            impl From<$ty> for Choice<$ty> {
                fn from(value: $ty) -> Self {
                    Choice::Value(value)
                }
            }
        )+
    };
}

/// Replay visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Visibility {
    /// Listed and searchable
    Public,
    /// Reachable by link only
    Unlisted,
    /// Uploader only
    Private,
}

/// Game playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Playlist {
    /// Casual 1v1
    UnrankedDuels,
    /// Casual 2v2
    UnrankedDoubles,
    /// Casual 3v3
    UnrankedStandard,
    /// Casual 4v4
    UnrankedChaos,
    /// Private match
    Private,
    /// Season mode
    Season,
    /// Exhibition
    Offline,
    /// Competitive 1v1
    RankedDuels,
    /// Competitive 2v2
    RankedDoubles,
    /// Competitive solo 3v3
    RankedSoloStandard,
    /// Competitive 3v3
    RankedStandard,
    /// Snow Day
    Snowday,
    /// Rocket Labs
    Rocketlabs,
    /// Hoops
    Hoops,
    /// Rumble
    Rumble,
    /// Tournament
    Tournament,
    /// Dropshot
    Dropshot,
    /// Competitive Hoops
    RankedHoops,
    /// Competitive Rumble
    RankedRumble,
    /// Competitive Dropshot
    RankedDropshot,
    /// Competitive Snow Day
    RankedSnowday,
    /// Dropshot Rumble
    DropshotRumble,
    /// Heatseeker
    Heatseeker,
}

/// Competitive season. Legacy seasons are numbered, free-to-play seasons
/// carry an `f` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Season {
    #[strum(serialize = "1")]
    S1,
    #[strum(serialize = "2")]
    S2,
    #[strum(serialize = "3")]
    S3,
    #[strum(serialize = "4")]
    S4,
    #[strum(serialize = "5")]
    S5,
    #[strum(serialize = "6")]
    S6,
    #[strum(serialize = "7")]
    S7,
    #[strum(serialize = "8")]
    S8,
    #[strum(serialize = "9")]
    S9,
    #[strum(serialize = "10")]
    S10,
    #[strum(serialize = "11")]
    S11,
    #[strum(serialize = "12")]
    S12,
    #[strum(serialize = "13")]
    S13,
    #[strum(serialize = "14")]
    S14,
    #[strum(serialize = "f1")]
    F1,
    #[strum(serialize = "f2")]
    F2,
    #[strum(serialize = "f3")]
    F3,
    #[strum(serialize = "f4")]
    F4,
    #[strum(serialize = "f5")]
    F5,
    #[strum(serialize = "f6")]
    F6,
    #[strum(serialize = "f7")]
    F7,
    #[strum(serialize = "f8")]
    F8,
    #[strum(serialize = "f9")]
    F9,
    #[strum(serialize = "f10")]
    F10,
    #[strum(serialize = "f11")]
    F11,
    #[strum(serialize = "f12")]
    F12,
}

/// Outcome from the uploader's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum MatchResult {
    #[allow(missing_docs)]
    Win,
    #[allow(missing_docs)]
    Loss,
}

/// Competitive rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Rank {
    Unranked,
    #[strum(serialize = "bronze-1")]
    Bronze1,
    #[strum(serialize = "bronze-2")]
    Bronze2,
    #[strum(serialize = "bronze-3")]
    Bronze3,
    #[strum(serialize = "silver-1")]
    Silver1,
    #[strum(serialize = "silver-2")]
    Silver2,
    #[strum(serialize = "silver-3")]
    Silver3,
    #[strum(serialize = "gold-1")]
    Gold1,
    #[strum(serialize = "gold-2")]
    Gold2,
    #[strum(serialize = "gold-3")]
    Gold3,
    #[strum(serialize = "platinum-1")]
    Platinum1,
    #[strum(serialize = "platinum-2")]
    Platinum2,
    #[strum(serialize = "platinum-3")]
    Platinum3,
    #[strum(serialize = "diamond-1")]
    Diamond1,
    #[strum(serialize = "diamond-2")]
    Diamond2,
    #[strum(serialize = "diamond-3")]
    Diamond3,
    #[strum(serialize = "champion-1")]
    Champion1,
    #[strum(serialize = "champion-2")]
    Champion2,
    #[strum(serialize = "champion-3")]
    Champion3,
    #[strum(serialize = "grand-champion-1")]
    GrandChampion1,
    #[strum(serialize = "grand-champion-2")]
    GrandChampion2,
    #[strum(serialize = "grand-champion-3")]
    GrandChampion3,
    SupersonicLegend,
}

/// Arena codes. Anything missing here can be passed as a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Map {
    #[strum(serialize = "arc_standard_p")]
    StarbaseArc,
    #[strum(serialize = "beach_p")]
    Salty,
    #[strum(serialize = "cs_p")]
    ChampionsField,
    #[strum(serialize = "eurostadium_p")]
    Mannfield,
    #[strum(serialize = "farm_p")]
    Farmstead,
    #[strum(serialize = "neotokyo_standard_p")]
    NeoTokyo,
    #[strum(serialize = "park_p")]
    BeckwithPark,
    #[strum(serialize = "stadium_p")]
    DfhStadium,
    #[strum(serialize = "trainstation_p")]
    UrbanCentral,
    #[strum(serialize = "utopiastadium_p")]
    UtopiaColiseum,
    #[strum(serialize = "wasteland_s_p")]
    Wasteland,
    #[strum(serialize = "underwater_p")]
    AquaDome,
    #[strum(serialize = "chn_stadium_p")]
    ForbiddenTemple,
    #[strum(serialize = "street_p")]
    SovereignHeights,
    #[strum(serialize = "hoopsstadium_p")]
    DunkHouse,
    #[strum(serialize = "shattershot_p")]
    CoreSevenSevenSeven,
}

/// Sort key for replay listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ReplaySortBy {
    /// When the match was played
    ReplayDate,
    /// When the replay was uploaded
    UploadDate,
}

/// Sort key for group listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum GroupSortBy {
    /// Creation time
    Created,
    /// Group name
    Name,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SortDirection {
    #[allow(missing_docs)]
    Asc,
    #[allow(missing_docs)]
    Desc,
}

/// How a group recognizes the same player across replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum PlayerIdentification {
    /// Platform account id
    ById,
    /// Display name
    ByName,
}

/// How a group recognizes the same team across replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum TeamIdentification {
    /// Fixed rosters
    ByDistinctPlayers,
    /// Rosters with substitutes
    ByPlayerClusters,
}

/// Stat section of a group CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum GroupStat {
    /// Per-player totals
    Players,
    /// Per-team totals
    Teams,
    /// Per-player, per-game rows
    PlayersGames,
    /// Per-team, per-game rows
    TeamsGames,
}

/// Account platform used in player id filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
#[allow(missing_docs)]
pub enum Platform {
    Steam,
    Epic,
    Ps4,
    Xbox,
    Switch,
}

/// Uploader filter shortcut. Any other uploader is a literal Steam id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Uploader {
    /// The token holder
    Me,
}

impl From<u64> for Choice<Uploader> {
    fn from(steam_id: u64) -> Self {
        Choice::Literal(steam_id.to_string())
    }
}

wire_enum!(
    Visibility,
    Playlist,
    Season,
    MatchResult,
    Rank,
    Map,
    ReplaySortBy,
    GroupSortBy,
    SortDirection,
    PlayerIdentification,
    TeamIdentification,
    GroupStat,
    Platform,
    Uploader,
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_kebab_case_wire_values() {
        assert_eq!(Playlist::RankedSoloStandard.wire(), "ranked-solo-standard");
        assert_eq!(TeamIdentification::ByDistinctPlayers.wire(), "by-distinct-players");
        assert_eq!(ReplaySortBy::UploadDate.wire(), "upload-date");
        assert_eq!(GroupStat::PlayersGames.wire(), "players-games");
    }

    #[test]
    fn test_explicit_wire_values() {
        assert_eq!(Rank::GrandChampion2.wire(), "grand-champion-2");
        assert_eq!(Rank::SupersonicLegend.wire(), "supersonic-legend");
        assert_eq!(Season::F3.wire(), "f3");
        assert_eq!(Season::S14.wire(), "14");
        assert_eq!(Map::StarbaseArc.wire(), "arc_standard_p");
    }

    #[test]
    fn test_bool_is_lowercase() {
        assert_eq!(true.wire(), "true");
        assert_eq!(false.wire(), "false");
    }

    #[test]
    fn test_literal_passes_through() {
        let choice: Choice<Rank> = "Grand Champion".into();
        assert_eq!(choice.wire(), "Grand Champion");
        let uploader: Choice<Uploader> = 76561198000000000u64.into();
        assert_eq!(uploader.wire(), "76561198000000000");
    }

    #[test]
    fn test_date_is_rfc3339_utc() {
        let date: DateFilter = Utc.with_ymd_and_hms(2022, 5, 1, 12, 30, 0).unwrap().into();
        assert_eq!(date.wire(), "2022-05-01T12:30:00Z");
    }

    #[test]
    fn test_choice_serializes_as_wire_string() {
        let choice: Choice<Visibility> = Visibility::Unlisted.into();
        assert_eq!(serde_json::to_value(&choice).unwrap(), serde_json::json!("unlisted"));
    }
}
