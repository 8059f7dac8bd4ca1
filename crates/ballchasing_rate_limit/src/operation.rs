//! The closed set of API capabilities.

use serde::{Deserialize, Serialize};

/// One distinct API capability and the unit of rate gating.
///
/// The snake_case form is used as the key in TOML budget tables.
///
/// # Examples
///
/// ```
/// use ballchasing_rate_limit::Operation;
/// use std::str::FromStr;
///
/// assert_eq!(Operation::from_str("list_replays").unwrap(), Operation::ListReplays);
/// assert_eq!(Operation::GetGroup.to_string(), "get_group");
/// assert!(!Operation::UploadReplay.is_metered());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// `GET /api`
    Ping,
    /// `POST /api/v2/upload`
    UploadReplay,
    /// `GET /api/replays`
    ListReplays,
    /// `GET /api/replays/{id}`
    GetReplay,
    /// `DELETE /api/replays/{id}`
    DeleteReplay,
    /// `PATCH /api/replays/{id}`
    PatchReplay,
    /// `GET /api/replays/{id}/file`
    DownloadReplay,
    /// `POST /api/groups`
    CreateGroup,
    /// `GET /api/groups`
    ListGroups,
    /// `GET /api/groups/{id}`
    GetGroup,
    /// `DELETE /api/groups/{id}`
    DeleteGroup,
    /// `PATCH /api/groups/{id}`
    PatchGroup,
    /// `GET /api/maps`
    Maps,
    /// `GET /dyn/replay/{id}/threejs`
    GetThreejs,
    /// `GET /dyn/replay/{id}/timeline`
    GetTimeline,
    /// `GET /dl/stats/group-{stat}/{id}/{id}-{stat}.csv`
    ExportCsv,
}

impl Operation {
    /// Whether this operation is ever subject to a client-side budget.
    ///
    /// Upload, map listing and the three site-export endpoints are never
    /// gated; budget tables that name them are rejected.
    pub fn is_metered(self) -> bool {
        !matches!(
            self,
            Operation::UploadReplay
                | Operation::Maps
                | Operation::GetThreejs
                | Operation::GetTimeline
                | Operation::ExportCsv
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_metered_count() {
        let metered = Operation::iter().filter(|op| op.is_metered()).count();
        assert_eq!(metered, 11);
    }

    #[test]
    fn test_snake_case_round_trip_for_every_operation() {
        for op in Operation::iter() {
            let name: &'static str = op.into();
            assert_eq!(name.parse::<Operation>().unwrap(), op);
        }
    }
}
