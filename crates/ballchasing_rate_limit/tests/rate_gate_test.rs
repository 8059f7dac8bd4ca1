//! Timing tests for the rate gate.

use ballchasing_rate_limit::{
    GateOptions, Operation, OperationBudget, PatreonTier, RateGate, Tier,
};
use std::time::{Duration, Instant};

/// Two calls per second on ping only.
struct PingOnly;

impl Tier for PingOnly {
    fn budget(&self, operation: Operation) -> Option<OperationBudget> {
        (operation == Operation::Ping).then(|| OperationBudget::per_second(2))
    }

    fn name(&self) -> &str {
        "Ping Only"
    }
}

#[test]
fn test_one_entry_per_budgeted_operation() {
    let gate = RateGate::new(&PatreonTier::Gold, GateOptions::default()).unwrap();
    assert_eq!(gate.len(), 11);
    assert!(gate.is_gated(Operation::GetGroup));
    assert!(!gate.is_gated(Operation::Maps));
    assert!(!gate.is_gated(Operation::ExportCsv));

    let single = RateGate::new(&PingOnly, GateOptions::default()).unwrap();
    assert_eq!(single.len(), 1);
    assert!(!single.is_gated(Operation::ListReplays));
}

#[tokio::test]
async fn test_third_call_waits_for_window() {
    let gate = RateGate::new(&PingOnly, GateOptions::default()).unwrap();

    let start = Instant::now();
    gate.acquire(Operation::Ping).await;
    gate.acquire(Operation::Ping).await;
    assert!(start.elapsed() < Duration::from_millis(100), "first two should not wait");

    gate.acquire(Operation::Ping).await;
    assert!(
        start.elapsed() >= Duration::from_millis(1000),
        "third call returned after {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn test_no_window_exceeds_capacity() {
    let gate = RateGate::new(&PingOnly, GateOptions::default()).unwrap();

    let mut granted = Vec::new();
    for _ in 0..5 {
        gate.acquire(Operation::Ping).await;
        granted.push(Instant::now());
    }

    for pair in granted.windows(3) {
        assert!(
            pair[2].duration_since(pair[0]) >= Duration::from_millis(990),
            "three grants within one window: {:?}",
            pair
        );
    }
}

#[tokio::test]
async fn test_safe_start_admits_initial_burst() {
    let options = GateOptions {
        safe_start: true,
        ..Default::default()
    };
    let gate = RateGate::new(&PingOnly, options).unwrap();
    assert!(gate.entry(Operation::Ping).unwrap().safe_start());

    let start = Instant::now();
    gate.acquire(Operation::Ping).await;
    gate.acquire(Operation::Ping).await;
    assert!(start.elapsed() < Duration::from_millis(100));
    assert!(!gate.try_acquire(Operation::Ping));
}

#[tokio::test]
async fn test_ungated_operation_never_waits() {
    let gate = RateGate::new(&PingOnly, GateOptions::default()).unwrap();
    let start = Instant::now();
    for _ in 0..50 {
        gate.acquire(Operation::ListReplays).await;
    }
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn test_cancelled_waiter_does_not_consume_budget() {
    let gate = RateGate::new(&PingOnly, GateOptions::default()).unwrap();
    gate.acquire(Operation::Ping).await;
    gate.acquire(Operation::Ping).await;

    // Give up on the third call long before the window rolls over.
    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), gate.acquire(Operation::Ping)).await;
    assert!(timed_out.is_err());

    // Once the window has passed, the full capacity is available again.
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(gate.try_acquire(Operation::Ping));
    assert!(gate.try_acquire(Operation::Ping));
    assert!(!gate.try_acquire(Operation::Ping));
}

#[tokio::test]
async fn test_clones_share_budget() {
    let gate = RateGate::new(&PingOnly, GateOptions::default()).unwrap();
    let clone = gate.clone();
    assert!(gate.try_acquire(Operation::Ping));
    assert!(clone.try_acquire(Operation::Ping));
    assert!(!gate.try_acquire(Operation::Ping));
    assert!(!clone.try_acquire(Operation::Ping));
}

#[tokio::test]
async fn test_concurrent_waiters_are_all_served() {
    let gate = RateGate::new(&PingOnly, GateOptions::default()).unwrap();
    let start = Instant::now();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.acquire(Operation::Ping).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    // Two in the first window, two more once it rolls over.
    assert!(start.elapsed() >= Duration::from_millis(1000));
    assert!(start.elapsed() < Duration::from_millis(1900));
}
