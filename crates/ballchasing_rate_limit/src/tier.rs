//! Tier trait for representing per-operation budget constraints.

use crate::Operation;
use std::time::Duration;

/// Capacity and refill window for one operation.
///
/// A budget of `capacity = 2, window = 1s` admits two calls back-to-back and
/// then holds the third until the first is a full second old.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationBudget {
    /// Units granted per window
    pub capacity: u32,
    /// Length of one refill window
    pub window: Duration,
}

impl OperationBudget {
    /// Budget of `capacity` calls per second.
    pub const fn per_second(capacity: u32) -> Self {
        Self {
            capacity,
            window: Duration::from_secs(1),
        }
    }

    /// Budget of `capacity` calls per `window`.
    pub const fn new(capacity: u32, window: Duration) -> Self {
        Self { capacity, window }
    }
}

/// Represents the budget table of one subscription level.
///
/// Operations for which `budget` returns `None` are never gated.
///
/// # Example
///
/// ```
/// use ballchasing_rate_limit::{Operation, OperationBudget, Tier};
///
/// struct Generous;
///
/// impl Tier for Generous {
///     fn budget(&self, operation: Operation) -> Option<OperationBudget> {
///         operation.is_metered().then(|| OperationBudget::per_second(100))
///     }
///     fn name(&self) -> &str { "Generous" }
/// }
///
/// assert_eq!(Generous.budget(Operation::Ping).unwrap().capacity, 100);
/// assert!(Generous.budget(Operation::Maps).is_none());
/// ```
pub trait Tier: Send + Sync {
    /// Budget for `operation`, or `None` when it is not gated.
    fn budget(&self, operation: Operation) -> Option<OperationBudget>;

    /// Name of the tier (e.g., "Gold", "Grand Champion").
    fn name(&self) -> &str;
}
