//! Configuration structures for rate budgets.
//!
//! This module provides TOML-based budget tables. The configuration system
//! supports:
//! - Bundled defaults (include_str! from ballchasing.toml)
//! - User overrides (./ballchasing.toml or ~/.config/ballchasing/ballchasing.toml)
//! - Automatic merging with user values taking precedence

use crate::{Operation, OperationBudget, Tier};
use ballchasing_error::{
    BallchasingError, BallchasingResult, ConfigError, RateLimitError, RateLimitErrorKind,
};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Budget for one operation as written in TOML.
///
/// ```toml
/// [tiers.gold.operations.list_replays]
/// capacity = 2
/// window_ms = 1000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BudgetEntry {
    /// Units granted per window
    pub capacity: u32,
    /// Window length in milliseconds
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_window_ms() -> u64 {
    1000
}

impl From<BudgetEntry> for OperationBudget {
    fn from(entry: BudgetEntry) -> Self {
        OperationBudget::new(entry.capacity, Duration::from_millis(entry.window_ms))
    }
}

/// Configuration for one subscription tier.
///
/// Implements [`Tier`] so a tier loaded from TOML can seed a rate gate the
/// same way a built-in [`PatreonTier`](crate::PatreonTier) does. Operation
/// keys that do not name a known operation are ignored by [`Tier::budget`]
/// and reported by [`TierConfig::validate`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Display name of the tier (e.g., "Gold")
    pub name: String,

    /// Budgets keyed by snake_case operation name
    #[serde(default)]
    pub operations: HashMap<String, BudgetEntry>,
}

impl Tier for TierConfig {
    fn budget(&self, operation: Operation) -> Option<OperationBudget> {
        let key: &'static str = operation.into();
        self.operations.get(key).copied().map(OperationBudget::from)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// Check that every key names a metered operation and every budget is
    /// non-empty.
    ///
    /// # Errors
    ///
    /// Returns a [`RateLimitError`] for the first offending entry.
    pub fn validate(&self) -> BallchasingResult<()> {
        for (key, entry) in &self.operations {
            let operation: Operation = key.parse().map_err(|_| {
                RateLimitError::new(RateLimitErrorKind::UnknownOperation(key.clone()))
            })?;
            if !operation.is_metered() {
                return Err(RateLimitError::new(RateLimitErrorKind::InvalidBudget {
                    operation: key.clone(),
                    reason: "operation is never rate limited".to_string(),
                })
                .into());
            }
            if entry.capacity == 0 || entry.window_ms == 0 {
                return Err(RateLimitError::new(RateLimitErrorKind::InvalidBudget {
                    operation: key.clone(),
                    reason: "capacity and window_ms must be positive".to_string(),
                })
                .into());
            }
        }
        Ok(())
    }
}

/// Top-level budget configuration.
///
/// Loads tier tables from TOML files with a precedence system:
/// 1. Bundled defaults (include_str! from ballchasing.toml)
/// 2. User override (./ballchasing.toml or ~/.config/ballchasing/ballchasing.toml)
///
/// # Example
///
/// ```no_run
/// use ballchasing_rate_limit::{Operation, RateLimitConfig, Tier};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RateLimitConfig::load()?;
/// let tier = config.tier(Some("diamond"))?;
/// println!("{:?}", tier.budget(Operation::ListReplays));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Tier used when none is named
    pub default_tier: String,

    /// Map of tier key to tier configuration
    #[serde(default)]
    pub tiers: HashMap<String, TierConfig>,
}

impl RateLimitConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BallchasingResult<Self> {
        debug!("Loading budget configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                BallchasingError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BallchasingError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (ballchasing.toml shipped with the library)
    /// 2. User config in home directory (~/.config/ballchasing/ballchasing.toml)
    /// 3. User config in current directory (./ballchasing.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> BallchasingResult<Self> {
        debug!("Loading budget configuration: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../ballchasing.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/ballchasing/ballchasing.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("ballchasing").required(false));

        builder
            .build()
            .map_err(|e| {
                BallchasingError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BallchasingError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Get a tier configuration, or `None` if the tier is not defined.
    ///
    /// Uses `default_tier` when `tier_name` is `None`.
    #[instrument(skip(self))]
    pub fn get_tier(&self, tier_name: Option<&str>) -> Option<TierConfig> {
        let tier = tier_name.unwrap_or(&self.default_tier);
        debug!(tier, "Looking up tier configuration");
        self.tiers.get(tier).cloned()
    }

    /// Get and validate a tier configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitErrorKind::InvalidTier`] if the tier is missing, or
    /// the first validation failure of its budget table.
    pub fn tier(&self, tier_name: Option<&str>) -> BallchasingResult<TierConfig> {
        let tier = self.get_tier(tier_name).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::InvalidTier(
                tier_name.unwrap_or(&self.default_tier).to_string(),
            ))
        })?;
        tier.validate()?;
        Ok(tier)
    }
}
