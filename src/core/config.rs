//! Gateway configuration and policy parameters.
//!
//! Parameters are divided into:
//! - Identities: the owner and the gateway's own operating identity, fixed at deployment
//! - Policy: amount bounds and the confirmation threshold

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::utils::constants::*;
use crate::utils::crypto::AccountId;

// ═══════════════════════════════════════════════════════════════════════════════
// POLICY PARAMETERS
// ═══════════════════════════════════════════════════════════════════════════════

/// Policy parameters (set at deployment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeParams {
    /// Minimum deposit / withdrawal amount in satoshis
    pub min_amount: u64,

    /// Maximum deposit / withdrawal amount in satoshis
    pub max_amount: u64,

    /// Bitcoin confirmations required before a deposit can be confirmed
    pub required_confirmations: u64,
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            min_amount: MIN_DEPOSIT_AMOUNT,
            max_amount: MAX_DEPOSIT_AMOUNT,
            required_confirmations: REQUIRED_CONFIRMATIONS,
        }
    }
}

impl BridgeParams {
    /// Override the amount bounds
    pub fn with_amount_bounds(mut self, min: u64, max: u64) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    /// Override the confirmation threshold
    pub fn with_required_confirmations(mut self, confirmations: u64) -> Self {
        self.required_confirmations = confirmations;
        self
    }

    /// Validate parameters are consistent
    pub fn validate(&self) -> bool {
        self.min_amount > 0 && self.min_amount <= self.max_amount && self.required_confirmations > 0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BRIDGE CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Deployment configuration of one gateway instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Owner (deployer); the only account allowed to administer the gateway
    pub owner: AccountId,

    /// The gateway's own operating identity on the host chain
    pub bridge_identity: AccountId,

    /// Policy parameters
    pub params: BridgeParams,

    /// Events retained in memory until drained with `take_events`
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,
}

fn default_event_log_capacity() -> usize {
    DEFAULT_EVENT_LOG_CAPACITY
}

impl BridgeConfig {
    /// Create a configuration with default policy
    pub fn new(owner: AccountId, bridge_identity: AccountId) -> Self {
        Self {
            owner,
            bridge_identity,
            params: BridgeParams::default(),
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }

    /// Replace the policy parameters
    pub fn with_params(mut self, params: BridgeParams) -> Self {
        self.params = params;
        self
    }

    /// Override how many events are retained between drains. Zero keeps
    /// none; events still reach the tracing subscriber.
    pub fn with_event_log_capacity(mut self, capacity: usize) -> Self {
        self.event_log_capacity = capacity;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.owner.is_well_formed() {
            return Err(Error::Config(format!("owner '{}' is not a valid account", self.owner)));
        }
        if !self.bridge_identity.is_well_formed() {
            return Err(Error::Config(format!(
                "bridge identity '{}' is not a valid account",
                self.bridge_identity
            )));
        }
        if self.owner == self.bridge_identity {
            return Err(Error::Config("owner and bridge identity must differ".into()));
        }
        if !self.params.validate() {
            return Err(Error::Config(format!("inconsistent policy: {:?}", self.params)));
        }
        Ok(())
    }

    /// Load from environment variables.
    ///
    /// `GATEWAY_OWNER` and `GATEWAY_IDENTITY` are required; the policy
    /// variables fall back to defaults when unset.
    pub fn from_env() -> Result<Self> {
        let owner = std::env::var("GATEWAY_OWNER")
            .map_err(|_| Error::Config("GATEWAY_OWNER is not set".into()))?;
        let identity = std::env::var("GATEWAY_IDENTITY")
            .map_err(|_| Error::Config("GATEWAY_IDENTITY is not set".into()))?;

        let mut params = BridgeParams::default();
        if let Some(min) = env_u64("GATEWAY_MIN_AMOUNT")? {
            params.min_amount = min;
        }
        if let Some(max) = env_u64("GATEWAY_MAX_AMOUNT")? {
            params.max_amount = max;
        }
        if let Some(confirmations) = env_u64("GATEWAY_REQUIRED_CONFIRMATIONS")? {
            params.required_confirmations = confirmations;
        }

        let mut config = Self::new(AccountId::new(owner), AccountId::new(identity)).with_params(params);
        if let Some(capacity) = env_u64("GATEWAY_EVENT_LOG_CAPACITY")? {
            config.event_log_capacity = usize::try_from(capacity).map_err(|_| {
                Error::Config(format!("GATEWAY_EVENT_LOG_CAPACITY out of range: {}", capacity))
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("failed to create config dir: {}", e)))?;
        }

        std::fs::write(path.as_ref(), content)
            .map_err(|e| Error::Config(format!("failed to write config: {}", e)))
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be an unsigned integer, got '{}'", name, value))),
        Err(_) => Ok(None),
    }
}
