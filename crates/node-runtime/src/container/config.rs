//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! ## Sources
//!
//! Defaults, overridden by environment variables:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PT_RUN_MODE` | `run_mode` (`dev`, `testnet`, `mainnet`) |
//! | `PT_AGENT_KEY` | `agent` (hex public key) |
//! | `PT_PRIVATE_TX` | `gate.private_tx_enabled` |
//! | `PT_COMMIT_TIMEOUT_MS` | `gate.commit_timeout_ms` |
//! | `PT_SETTLEMENT_MAX_ATTEMPTS` | `settlement.max_attempts` |
//! | `PT_SETTLEMENT_REDRIVE_SECS` | `settlement.redrive_interval_secs` |
//! | `PT_BUS_CAPACITY` | `bus_capacity` |
//!
//! ## Security Requirements
//!
//! - The settling agent MUST NOT be the built-in development key on mainnet.

use pt_01_group_membership::GroupConfig;
use pt_05_settlement_bridge::SettlementConfig;
use pt_06_visibility_gate::GateConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::entities::Participant;
use std::str::FromStr;
use thiserror::Error;

/// Public key of the development settling agent.
pub const DEV_AGENT_KEY: &str =
    "0x0379be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Local development.
    #[default]
    Dev,
    /// Shared test network.
    Testnet,
    /// Production.
    Mainnet,
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "dev" => Ok(Self::Dev),
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            _ => Err(ConfigError::invalid("PT_RUN_MODE", value)),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Deployment environment.
    pub run_mode: RunMode,
    /// Settling agent; member of every trading group.
    pub agent: Participant,
    /// Privacy group limits.
    pub group: GroupConfig,
    /// Settlement retries.
    pub settlement: SettlementConfig,
    /// Visibility gate switches.
    pub gate: GateConfig,
    /// Event bus channel capacity.
    pub bus_capacity: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Dev,
            agent: dev_agent(),
            group: GroupConfig::default(),
            settlement: SettlementConfig::default(),
            gate: GateConfig::default(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup("PT_RUN_MODE") {
            config.run_mode = mode.parse()?;
        }
        if let Some(key) = lookup("PT_AGENT_KEY") {
            config.agent = Participant::from_hex(key.trim())
                .map_err(|_| ConfigError::invalid("PT_AGENT_KEY", &key))?;
            if config.agent.public_key().is_empty() {
                return Err(ConfigError::invalid("PT_AGENT_KEY", &key));
            }
        }
        override_parsed(&lookup, "PT_PRIVATE_TX", &mut config.gate.private_tx_enabled)?;
        override_parsed(&lookup, "PT_COMMIT_TIMEOUT_MS", &mut config.gate.commit_timeout_ms)?;
        override_parsed(
            &lookup,
            "PT_SETTLEMENT_MAX_ATTEMPTS",
            &mut config.settlement.max_attempts,
        )?;
        override_parsed(
            &lookup,
            "PT_SETTLEMENT_REDRIVE_SECS",
            &mut config.settlement.redrive_interval_secs,
        )?;
        override_parsed(&lookup, "PT_BUS_CAPACITY", &mut config.bus_capacity)?;

        if config.bus_capacity == 0 {
            return Err(ConfigError::invalid("PT_BUS_CAPACITY", "0"));
        }
        Ok(config)
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if a mainnet node would settle with the development
    /// agent key.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.run_mode == RunMode::Mainnet && self.agent == dev_agent() {
            return Err(ConfigError::InsecureAgentKey);
        }
        Ok(())
    }
}

fn dev_agent() -> Participant {
    // DEV_AGENT_KEY is valid hex.
    Participant::from_hex(DEV_AGENT_KEY).unwrap_or_else(|_| Participant::new(vec![0x03; 33]))
}

fn override_parsed<F, T>(lookup: &F, name: &'static str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(name) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid(name, &raw))?;
    }
    Ok(())
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Mainnet with the development agent key.
    #[error(
        "SECURITY VIOLATION: settlement agent is the development key. \
         Set PT_AGENT_KEY for mainnet."
    )]
    InsecureAgentKey,
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str) -> Self {
        Self::InvalidValue {
            var,
            value: value.to_string(),
        }
    }
}
