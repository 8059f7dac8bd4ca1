//! Patreon subscription tiers and their budget tables.
//!
//! Listing and fetching endpoints scale with the tier; write endpoints and
//! ping stay at two calls per second for everyone.

use crate::{Operation, OperationBudget, Tier};
use serde::{Deserialize, Serialize};

/// Ballchasing Patreon tiers.
///
/// Based on the published API limits at <https://ballchasing.com/doc/api>.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PatreonTier {
    /// No subscription
    #[default]
    None,
    /// Gold: same per-second limits as regular
    Gold,
    /// Diamond: 4 list/get calls per second
    Diamond,
    /// Champion: 8 list/get calls per second
    Champion,
    /// Grand Champion: 16 list/get calls per second
    GrandChampion,
}

impl PatreonTier {
    fn read_rate(&self) -> u32 {
        match self {
            PatreonTier::None | PatreonTier::Gold => 2,
            PatreonTier::Diamond => 4,
            PatreonTier::Champion => 8,
            PatreonTier::GrandChampion => 16,
        }
    }
}

impl Tier for PatreonTier {
    fn budget(&self, operation: Operation) -> Option<OperationBudget> {
        match operation {
            Operation::ListReplays
            | Operation::GetReplay
            | Operation::ListGroups
            | Operation::GetGroup => Some(OperationBudget::per_second(self.read_rate())),
            Operation::Ping
            | Operation::DeleteReplay
            | Operation::PatchReplay
            | Operation::DownloadReplay
            | Operation::CreateGroup
            | Operation::DeleteGroup
            | Operation::PatchGroup => Some(OperationBudget::per_second(2)),
            Operation::UploadReplay
            | Operation::Maps
            | Operation::GetThreejs
            | Operation::GetTimeline
            | Operation::ExportCsv => None,
        }
    }

    fn name(&self) -> &str {
        match self {
            PatreonTier::None => "None",
            PatreonTier::Gold => "Gold",
            PatreonTier::Diamond => "Diamond",
            PatreonTier::Champion => "Champion",
            PatreonTier::GrandChampion => "Grand Champion",
        }
    }
}
