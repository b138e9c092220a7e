use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::types::{Result, VerifierError};

pub const ENV_PREFIX: &str = "TRANSFER_VERIFIER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            name: "Verifier".to_string(),
            version: "1".to_string(),
            chain_id: 1,
            verifying_contract: Address::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Honor each signed request at most once.
    pub enable_replay_protection: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreasuryConfig {
    pub initial_balance: U256, // wei
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            initial_balance: U256::from(10_000_000_000_000_000_000u128), // 10 ETH
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub domain: DomainConfig,
    pub security: SecurityConfig,
    pub treasury: TreasuryConfig,
    pub log_level: String,
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: DomainConfig::default(),
            security: SecurityConfig::default(),
            treasury: TreasuryConfig::default(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    pub fn from_file(path: &str) -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Like [`Config::from_file`], but a missing file falls back to defaults.
    pub fn load(path: &str) -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
    }

    pub fn validate(&self) -> Result<()> {
        if self.domain.name.trim().is_empty() {
            return Err(VerifierError::Config("domain name cannot be empty".to_string()));
        }

        if self.domain.version.trim().is_empty() {
            return Err(VerifierError::Config("domain version cannot be empty".to_string()));
        }

        if self.domain.chain_id == 0 {
            return Err(VerifierError::Config("chain id cannot be zero".to_string()));
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
