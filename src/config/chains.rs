use crate::error::{ConfigError, Result};
use alloy::primitives::{address, Address};
use std::str::FromStr;

pub const SEPOLIA_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com/";
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
/// Encrypted-ETH contract every action targets.
pub const EETH_CONTRACT: Address = address!("87A3effB84CBE1E4caB6Ab430139eC41d156D55A");

/// Network boundary: one JSON-RPC endpoint, one chain id, one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    pub name: String,
    pub contract: Address,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}

impl ChainConfig {
    pub fn sepolia() -> Self {
        Self {
            rpc_url: SEPOLIA_RPC_URL.to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            name: "Sepolia".to_string(),
            contract: EETH_CONTRACT,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Sepolia defaults overlaid with whichever `REDACT_*` keys `lookup` yields.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::sepolia();
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = read("REDACT_RPC_URL") {
            validate_http_url("REDACT_RPC_URL", &url)?;
            config.rpc_url = url;
        }
        if let Some(raw) = read("REDACT_CHAIN_ID") {
            config.chain_id = raw.parse::<u64>().ok().filter(|id| *id > 0).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "REDACT_CHAIN_ID must be a positive integer, got `{raw}`"
                ))
            })?;
            if config.chain_id != SEPOLIA_CHAIN_ID {
                config.name = format!("chain-{}", config.chain_id);
            }
        }
        if let Some(raw) = read("REDACT_CONTRACT_ADDRESS") {
            config.contract = Address::from_str(&raw).map_err(|err| {
                ConfigError::Invalid(format!("invalid REDACT_CONTRACT_ADDRESS `{raw}`: {err}"))
            })?;
        }
        Ok(config)
    }
}

fn validate_http_url(name: &str, raw: &str) -> Result<()> {
    let parsed = raw.parse::<reqwest::Url>().map_err(|e| {
        ConfigError::Invalid(format!("{name} must be a valid URL, got `{raw}`: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!(
            "{name} must use http(s) scheme, got `{other}`"
        ))
        .into()),
    }
}
