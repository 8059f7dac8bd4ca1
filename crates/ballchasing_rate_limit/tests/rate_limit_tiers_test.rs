//! Tests for the built-in Patreon tier tables.

use ballchasing_rate_limit::{Operation, OperationBudget, PatreonTier, Tier};
use strum::IntoEnumIterator;

#[test]
fn test_none_tier() {
    let tier = PatreonTier::None;
    assert_eq!(tier.budget(Operation::ListReplays), Some(OperationBudget::per_second(2)));
    assert_eq!(tier.budget(Operation::Ping), Some(OperationBudget::per_second(2)));
    assert_eq!(tier.name(), "None");
}

#[test]
fn test_read_rates_scale_with_tier() {
    let expected = [
        (PatreonTier::None, 2),
        (PatreonTier::Gold, 2),
        (PatreonTier::Diamond, 4),
        (PatreonTier::Champion, 8),
        (PatreonTier::GrandChampion, 16),
    ];
    for (tier, rate) in expected {
        for op in [
            Operation::ListReplays,
            Operation::GetReplay,
            Operation::ListGroups,
            Operation::GetGroup,
        ] {
            assert_eq!(tier.budget(op).unwrap().capacity, rate, "{tier} / {op}");
        }
    }
}

#[test]
fn test_write_rates_are_flat() {
    for tier in PatreonTier::iter() {
        for op in [
            Operation::DeleteReplay,
            Operation::PatchReplay,
            Operation::DownloadReplay,
            Operation::CreateGroup,
            Operation::DeleteGroup,
            Operation::PatchGroup,
        ] {
            assert_eq!(tier.budget(op), Some(OperationBudget::per_second(2)));
        }
    }
}

#[test]
fn test_unmetered_operations_have_no_budget() {
    for tier in PatreonTier::iter() {
        for op in Operation::iter().filter(|op| !op.is_metered()) {
            assert!(tier.budget(op).is_none(), "{tier} / {op}");
        }
    }
}

#[test]
fn test_tier_parses_from_snake_case() {
    assert_eq!(
        "grand_champion".parse::<PatreonTier>().unwrap(),
        PatreonTier::GrandChampion
    );
    assert_eq!(PatreonTier::default(), PatreonTier::None);
}
