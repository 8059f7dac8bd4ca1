//! Client configuration and the shared client handle.

use crate::{DescriptorBuilder, Session};
use ballchasing_error::{BallchasingResult, ConfigError};
use ballchasing_rate_limit::{
    GateOptions, Operation, OperationBudget, PatreonTier, RateGate, RateLimitConfig, Tier,
    TierConfig,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Public API host.
pub const DEFAULT_BASE_URL: &str = "https://ballchasing.com";

/// Budget table a client is built against.
#[derive(Debug, Clone, PartialEq)]
pub enum TierSelection {
    /// One of the published Patreon tiers
    Builtin(PatreonTier),
    /// A tier loaded from `ballchasing.toml`
    Configured(TierConfig),
}

impl Default for TierSelection {
    fn default() -> Self {
        TierSelection::Builtin(PatreonTier::default())
    }
}

impl From<PatreonTier> for TierSelection {
    fn from(tier: PatreonTier) -> Self {
        TierSelection::Builtin(tier)
    }
}

impl From<TierConfig> for TierSelection {
    fn from(tier: TierConfig) -> Self {
        TierSelection::Configured(tier)
    }
}

impl Tier for TierSelection {
    fn budget(&self, operation: Operation) -> Option<OperationBudget> {
        match self {
            TierSelection::Builtin(tier) => tier.budget(operation),
            TierSelection::Configured(tier) => tier.budget(operation),
        }
    }

    fn name(&self) -> &str {
        match self {
            TierSelection::Builtin(tier) => tier.name(),
            TierSelection::Configured(tier) => tier.name(),
        }
    }
}

/// Everything needed to construct a [`Client`].
///
/// # Examples
///
/// ```
/// use ballchasing::{ClientConfigBuilder, PatreonTier, TierSelection};
///
/// let config = ClientConfigBuilder::default()
///     .token("T")
///     .tier(PatreonTier::Diamond)
///     .build()
///     .unwrap();
/// assert!(*config.auto_rate_limit());
/// assert_eq!(config.tier(), &TierSelection::Builtin(PatreonTier::Diamond));
/// ```
#[derive(Debug, Clone, PartialEq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct ClientConfig {
    /// API token sent as the `Authorization` header.
    token: String,
    /// Create rate trackers for the tier.
    #[builder(default = "true")]
    auto_rate_limit: bool,
    /// Budget table.
    #[builder(default)]
    tier: TierSelection,
    /// Reported with each tracker; every tracker starts full regardless.
    #[builder(default)]
    safe_start: bool,
    /// Several tasks will share the client concurrently.
    #[builder(default)]
    concurrent: bool,
    /// Window padding applied when `concurrent` is set.
    #[builder(default)]
    concurrency_slack: f64,
    /// Scheme and host requests are sent to.
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Report error responses through the default observer.
    #[builder(default = "true")]
    report_errors: bool,
}

impl ClientConfigBuilder {
    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the token is missing.
    pub fn build(&self) -> BallchasingResult<ClientConfig> {
        self.build_internal()
            .map_err(|e| ConfigError::new(format!("Invalid client configuration: {}", e)).into())
    }
}

impl ClientConfig {
    /// Configuration from the environment.
    ///
    /// Loads `.env` if present, then reads `BALLCHASING_TOKEN` (required),
    /// `BALLCHASING_TIER` (a built-in tier name or a tier from
    /// `ballchasing.toml`) and `BALLCHASING_AUTO_RATE_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a missing token, an unknown tier or
    /// an unparsable flag.
    #[instrument]
    pub fn from_env() -> BallchasingResult<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }

        let token = std::env::var("BALLCHASING_TOKEN")
            .map_err(|_| ConfigError::new("BALLCHASING_TOKEN environment variable not set"))?;

        let mut builder = ClientConfigBuilder::default();
        builder.token(token);

        if let Ok(name) = std::env::var("BALLCHASING_TIER") {
            builder.tier(resolve_tier(&name)?);
        }

        if let Ok(flag) = std::env::var("BALLCHASING_AUTO_RATE_LIMIT") {
            let enabled = flag.parse::<bool>().map_err(|_| {
                ConfigError::new(format!(
                    "BALLCHASING_AUTO_RATE_LIMIT must be true or false, got {}",
                    flag
                ))
            })?;
            builder.auto_rate_limit(enabled);
        }

        builder.build()
    }

    fn gate_options(&self) -> GateOptions {
        GateOptions {
            safe_start: self.safe_start,
            concurrent: self.concurrent,
            concurrency_slack: self.concurrency_slack,
        }
    }
}

/// Built-in tier names win; anything else is looked up in the layered
/// rate limit configuration.
fn resolve_tier(name: &str) -> BallchasingResult<TierSelection> {
    if let Ok(tier) = name.parse::<PatreonTier>() {
        return Ok(tier.into());
    }
    Ok(RateLimitConfig::load()?.tier(Some(name))?.into())
}

#[derive(Debug)]
struct ClientInner {
    descriptors: DescriptorBuilder,
    gate: RateGate,
    report_errors: bool,
}

/// Holds the token and rate trackers; hands out [`Session`]s.
///
/// Cloning is cheap. Clones and every session they create share one set of
/// rate trackers; separately constructed clients never do.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Build a client, creating one tracker per metered operation when
    /// automatic rate limiting is on.
    ///
    /// # Errors
    ///
    /// Fails for an unusable base URL or token, or an invalid budget.
    #[instrument(skip(config), fields(tier = config.tier.name(), auto_rate_limit = config.auto_rate_limit))]
    pub fn new(config: ClientConfig) -> BallchasingResult<Self> {
        let descriptors = DescriptorBuilder::new(&config.base_url, &config.token)?;
        let gate = if config.auto_rate_limit {
            RateGate::new(&config.tier, config.gate_options())?
        } else {
            RateGate::disabled()
        };
        info!(gated_operations = gate.len(), "Ballchasing client ready");
        Ok(Self {
            inner: Arc::new(ClientInner {
                descriptors,
                gate,
                report_errors: config.report_errors,
            }),
        })
    }

    /// Client configured from the environment. See [`ClientConfig::from_env`].
    pub fn from_env() -> BallchasingResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Session sending through `transport`.
    pub fn session(&self, transport: reqwest::Client) -> Session {
        Session::new(
            transport,
            self.inner.descriptors.clone(),
            self.inner.gate.clone(),
            self.inner.report_errors,
        )
    }

    /// Session with a default `reqwest` transport.
    pub fn session_default(&self) -> Session {
        self.session(reqwest::Client::new())
    }

    /// The shared rate trackers.
    pub fn gate(&self) -> &RateGate {
        &self.inner.gate
    }

    /// Request construction without sending.
    pub fn descriptors(&self) -> &DescriptorBuilder {
        &self.inner.descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(auto: bool) -> ClientConfig {
        ClientConfigBuilder::default()
            .token("T")
            .auto_rate_limit(auto)
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let err = ClientConfigBuilder::default().build().unwrap_err();
        assert!(err.to_string().contains("Configuration Error"));
    }

    #[test]
    fn test_defaults() {
        let config = config(true);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert!(*config.report_errors());
        assert!(!*config.safe_start());
        assert_eq!(config.tier(), &TierSelection::Builtin(PatreonTier::None));
    }

    #[test]
    fn test_disabled_rate_limit_has_no_trackers() {
        let client = Client::new(config(false)).unwrap();
        assert!(client.gate().is_empty());
    }

    #[test]
    fn test_clones_share_trackers() {
        let client = Client::new(config(true)).unwrap();
        let clone = client.clone();
        assert!(clone.gate().try_acquire(Operation::Ping));
        assert!(clone.gate().try_acquire(Operation::Ping));
        assert!(!client.gate().try_acquire(Operation::Ping));
    }

    #[test]
    fn test_separate_clients_do_not_share() {
        let first = Client::new(config(true)).unwrap();
        let second = Client::new(config(true)).unwrap();
        assert!(first.gate().try_acquire(Operation::Ping));
        assert!(first.gate().try_acquire(Operation::Ping));
        assert!(second.gate().try_acquire(Operation::Ping));
    }

    #[test]
    fn test_resolve_builtin_tier() {
        assert_eq!(
            resolve_tier("grand_champion").unwrap(),
            TierSelection::Builtin(PatreonTier::GrandChampion)
        );
        assert!(resolve_tier("platinum").is_err());
    }
}
