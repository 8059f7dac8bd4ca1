//! Rate budgets for the ballchasing API.
//!
//! Every subscription tier grants each metered [`Operation`] a budget of
//! `capacity` calls per `window`. A [`RateGate`] turns a tier into one
//! rolling-window tracker per operation and suspends callers until budget is
//! available.
//!
//! Budgets come either from the built-in [`PatreonTier`] table or from TOML
//! through [`RateLimitConfig`]; both implement [`Tier`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod gate;
mod operation;
mod tier;
pub mod tiers;

pub use config::{BudgetEntry, RateLimitConfig, TierConfig};
pub use gate::{GateOptions, RateGate, RateGateEntry};
pub use operation::Operation;
pub use tier::{OperationBudget, Tier};
pub use tiers::PatreonTier;
