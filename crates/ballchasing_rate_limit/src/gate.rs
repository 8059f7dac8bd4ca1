//! Per-operation rate gate over rolling windows.
//!
//! Each metered operation gets a log of its most recent grant instants. A
//! call is admitted only while fewer than `capacity` grants fall inside the
//! trailing window, so no window of that length ever holds more than
//! `capacity` grants. A grant is recorded only once the caller is admitted;
//! a waiter dropped while sleeping leaves the log untouched.

use crate::{Operation, OperationBudget, Tier};
use ballchasing_error::{BallchasingResult, RateLimitError, RateLimitErrorKind};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use strum::IntoEnumIterator;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, trace};

/// How trackers are built from a tier's budgets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GateOptions {
    /// Recorded for reporting only. Every tracker starts with its full
    /// `capacity` available whether or not this is set.
    pub safe_start: bool,
    /// Several tasks will share each tracker.
    pub concurrent: bool,
    /// Fraction added to each window when `concurrent` is set.
    pub concurrency_slack: f64,
}

/// Budget tracker for one operation.
#[derive(Debug, Clone)]
pub struct RateGateEntry {
    operation: Operation,
    budget: OperationBudget,
    effective_window: Duration,
    safe_start: bool,
    grants: Arc<Mutex<VecDeque<Instant>>>,
}

impl RateGateEntry {
    fn new(
        operation: Operation,
        budget: OperationBudget,
        options: &GateOptions,
    ) -> BallchasingResult<Self> {
        let invalid = |reason: &str| {
            RateLimitError::new(RateLimitErrorKind::InvalidBudget {
                operation: operation.to_string(),
                reason: reason.to_string(),
            })
        };

        if budget.capacity == 0 {
            return Err(invalid("capacity must be positive").into());
        }
        if budget.window.is_zero() {
            return Err(invalid("window must be positive").into());
        }

        let effective_window = if options.concurrent {
            Duration::try_from_secs_f64(
                budget.window.as_secs_f64() * (1.0 + options.concurrency_slack),
            )
            .map_err(|_| invalid("window padded by concurrency slack is out of range"))?
        } else {
            budget.window
        };

        debug!(
            %operation,
            capacity = budget.capacity,
            window_ms = effective_window.as_millis() as u64,
            safe_start = options.safe_start,
            "Created rate gate entry"
        );

        Ok(Self {
            operation,
            budget,
            effective_window,
            safe_start: options.safe_start,
            grants: Arc::new(Mutex::new(VecDeque::with_capacity(
                budget.capacity as usize,
            ))),
        })
    }

    /// Budget this entry was built from.
    pub fn budget(&self) -> OperationBudget {
        self.budget
    }

    /// Window after concurrency slack is applied.
    pub fn effective_window(&self) -> Duration {
        self.effective_window
    }

    /// Whether the entry was created with safe-start. Has no effect on
    /// admission; every entry starts full.
    pub fn safe_start(&self) -> bool {
        self.safe_start
    }

    /// Drop grants that have left the trailing window.
    fn expire(&self, grants: &mut VecDeque<Instant>, now: Instant) {
        while grants
            .front()
            .is_some_and(|granted| now.duration_since(*granted) >= self.effective_window)
        {
            grants.pop_front();
        }
    }

    fn has_room(&self, grants: &VecDeque<Instant>) -> bool {
        grants.len() < self.budget.capacity as usize
    }

    /// Waiters queue on the lock in arrival order; the holder sleeps until
    /// its oldest grant leaves the window.
    async fn acquire(&self) {
        let mut grants = self.grants.lock().await;
        loop {
            self.expire(&mut grants, Instant::now());
            if self.has_room(&grants) {
                break;
            }
            if let Some(oldest) = grants.front().copied() {
                let ready_at = oldest + self.effective_window;
                trace!(
                    operation = %self.operation,
                    wait_ms = ready_at.saturating_duration_since(Instant::now()).as_millis() as u64,
                    "Waiting for rate budget"
                );
                tokio::time::sleep_until(ready_at).await;
            }
        }
        grants.push_back(Instant::now());
    }

    /// Fails without waiting when the window is full or another caller is
    /// already waiting.
    fn try_acquire(&self) -> bool {
        let Ok(mut grants) = self.grants.try_lock() else {
            return false;
        };
        self.expire(&mut grants, Instant::now());
        if self.has_room(&grants) {
            grants.push_back(Instant::now());
            true
        } else {
            false
        }
    }
}

/// Map from operation to its budget tracker.
///
/// Cloning shares the trackers; every clone draws from the same budgets.
///
/// # Example
///
/// ```
/// use ballchasing_rate_limit::{GateOptions, Operation, PatreonTier, RateGate};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let gate = RateGate::new(&PatreonTier::Gold, GateOptions::default())?;
/// assert!(gate.is_gated(Operation::ListReplays));
/// assert!(!gate.is_gated(Operation::UploadReplay));
///
/// gate.acquire(Operation::ListReplays).await;
/// gate.acquire(Operation::UploadReplay).await; // returns immediately
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateGate {
    entries: HashMap<Operation, RateGateEntry>,
}

impl RateGate {
    /// Build one tracker per operation that `tier` budgets.
    ///
    /// Unmetered operations are skipped even if the tier lists them.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero capacity or window, or a negative or
    /// non-finite concurrency slack.
    #[instrument(skip(tier), fields(tier = tier.name()))]
    pub fn new(tier: &dyn Tier, options: GateOptions) -> BallchasingResult<Self> {
        if options.concurrent
            && !(options.concurrency_slack.is_finite() && options.concurrency_slack >= 0.0)
        {
            return Err(RateLimitError::new(RateLimitErrorKind::InvalidBudget {
                operation: "*".to_string(),
                reason: format!(
                    "concurrency slack must be a non-negative number, got {}",
                    options.concurrency_slack
                ),
            })
            .into());
        }

        let mut entries = HashMap::new();
        for operation in Operation::iter().filter(|op| op.is_metered()) {
            if let Some(budget) = tier.budget(operation) {
                entries.insert(operation, RateGateEntry::new(operation, budget, &options)?);
            }
        }

        debug!(entries = entries.len(), "Rate gate ready");
        Ok(Self { entries })
    }

    /// A gate with no trackers; every acquire returns immediately.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Wait until one unit of `operation`'s budget is available and take it.
    ///
    /// Returns immediately for operations without a tracker. There is no
    /// timeout; race this future against a deadline to bound the wait.
    pub async fn acquire(&self, operation: Operation) {
        if let Some(entry) = self.entries.get(&operation) {
            trace!(%operation, "Acquiring rate budget");
            entry.acquire().await;
        }
    }

    /// Take one unit without waiting.
    ///
    /// Returns `true` for ungated operations.
    pub fn try_acquire(&self, operation: Operation) -> bool {
        self.entries
            .get(&operation)
            .is_none_or(|entry| entry.try_acquire())
    }

    /// Whether `operation` has a tracker.
    pub fn is_gated(&self, operation: Operation) -> bool {
        self.entries.contains_key(&operation)
    }

    /// Tracker for `operation`, if any.
    pub fn entry(&self, operation: Operation) -> Option<&RateGateEntry> {
        self.entries.get(&operation)
    }

    /// Number of trackers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no operation is gated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PatreonTier;

    #[test]
    fn test_concurrency_slack_pads_window() {
        let options = GateOptions {
            concurrent: true,
            concurrency_slack: 0.5,
            ..Default::default()
        };
        let gate = RateGate::new(&PatreonTier::None, options).unwrap();
        let entry = gate.entry(Operation::Ping).unwrap();
        assert_eq!(entry.effective_window(), Duration::from_millis(1500));
    }

    #[test]
    fn test_slack_ignored_when_not_concurrent() {
        let options = GateOptions {
            concurrency_slack: 0.5,
            ..Default::default()
        };
        let gate = RateGate::new(&PatreonTier::None, options).unwrap();
        let entry = gate.entry(Operation::Ping).unwrap();
        assert_eq!(entry.effective_window(), Duration::from_secs(1));
    }

    #[test]
    fn test_negative_slack_rejected() {
        let options = GateOptions {
            concurrent: true,
            concurrency_slack: -0.1,
            ..Default::default()
        };
        assert!(RateGate::new(&PatreonTier::None, options).is_err());
    }

    #[test]
    fn test_entry_debug_shows_budget() {
        let gate = RateGate::new(&PatreonTier::None, GateOptions::default()).unwrap();
        let rendered = format!("{:?}", gate.entry(Operation::Ping).unwrap());
        assert!(rendered.contains("RateGateEntry"));
        assert!(rendered.contains("capacity: 2"));
    }

    #[test]
    fn test_huge_slack_is_an_error() {
        let options = GateOptions {
            concurrent: true,
            concurrency_slack: 1e300,
            ..Default::default()
        };
        assert!(RateGate::new(&PatreonTier::None, options).is_err());
    }

    #[test]
    fn test_disabled_gate_admits_everything() {
        let gate = RateGate::disabled();
        assert!(gate.is_empty());
        for _ in 0..100 {
            assert!(gate.try_acquire(Operation::ListReplays));
        }
    }
}
