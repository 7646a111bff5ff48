//! Configuration for the depot console.
//!
//! Configuration comes from two sources:
//! - Environment variables (via .env file or shell), prefixed with `DEPOT_`
//! - CLI arguments, which take precedence over the environment

use clap::{Parser, ValueEnum};
use depot::{InventoryConfig, RemovalPolicy, types::DEFAULT_MAX_NAME_LEN};

/// Log filter used when neither `RUST_LOG` nor configuration provide one.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Environment configuration.
#[derive(Debug, Default, serde::Deserialize)]
pub struct EnvConfig {
    /// Maximum length of product and destination names
    pub max_name_len: Option<usize>,

    /// What to do with pending orders of a removed batch (discard or reject)
    pub removal_policy: Option<RemovalPolicy>,

    /// tracing-subscriber filter directive (e.g., "depot=debug")
    pub log_filter: Option<String>,
}

impl EnvConfig {
    /// Load configuration from `DEPOT_`-prefixed environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("DEPOT_").from_env()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Drop pending orders together with the batch
    Discard,
    /// Refuse to remove batches with pending orders
    Reject,
}

impl From<PolicyArg> for RemovalPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Discard => RemovalPolicy::Discard,
            PolicyArg::Reject => RemovalPolicy::Reject,
        }
    }
}

/// CLI arguments.
#[derive(Debug, Default, Parser)]
#[command(name = "depot")]
#[command(about = "Perishable-goods depot: batches by expiration date with FIFO dispatch orders")]
pub struct CliConfig {
    /// Maximum length of product and destination names (default: 63)
    #[arg(long)]
    pub max_name_len: Option<usize>,

    /// What to do with pending orders when their batch is removed
    #[arg(long, value_enum)]
    pub removal_policy: Option<PolicyArg>,

    /// Log filter directive, overridden by RUST_LOG (default: warn)
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Merged configuration of the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub inventory: InventoryConfig,
    pub log_filter: String,
}

impl CliConfig {
    /// Merge CLI arguments over environment configuration.
    pub fn resolve(&self, env: EnvConfig) -> Result<Settings, ConfigError> {
        let max_name_len = self
            .max_name_len
            .or(env.max_name_len)
            .unwrap_or(DEFAULT_MAX_NAME_LEN);
        if max_name_len == 0 {
            return Err(ConfigError::ZeroNameLength);
        }

        let removal_policy = self
            .removal_policy
            .map(RemovalPolicy::from)
            .or(env.removal_policy)
            .unwrap_or_default();

        let log_filter = self
            .log_filter
            .clone()
            .or(env.log_filter)
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Settings {
            inventory: InventoryConfig {
                max_name_len,
                removal_policy,
            },
            log_filter,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("max_name_len must be at least 1")]
    ZeroNameLength,
}
