//! Chain configuration
//!
//! Explicit configuration object for the ledger connection. Defaults point
//! at the Sepolia deployment of the task contract; everything can be
//! overridden via a TOML file or `TASKCHAIN_*` environment variables.
//! The config is built once in the binary and passed down - no global
//! connection handles.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default public Sepolia RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia.publicnode.com";

/// Deployed task contract (Sepolia).
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xa564E0967A252E813051Cb278BF84fE567617D2E";

/// In-flight per-id fetches during a full-range pass.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Per-request HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ledger connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Task contract address.
    pub contract_address: String,
    /// Bounded fan-out width for full-range fetches.
    pub fetch_concurrency: usize,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ChainConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: ChainConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply `TASKCHAIN_*` environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("TASKCHAIN_RPC_URL") {
            self.rpc_url = url;
        }
        if let Ok(address) = std::env::var("TASKCHAIN_CONTRACT") {
            self.contract_address = address;
        }
        if let Ok(concurrency) = std::env::var("TASKCHAIN_FETCH_CONCURRENCY") {
            if let Ok(value) = concurrency.parse::<usize>() {
                self.fetch_concurrency = value.max(1);
            }
        }
        if let Ok(timeout) = std::env::var("TASKCHAIN_TIMEOUT_SECS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.request_timeout_secs = value;
            }
        }
        self
    }

    /// Resolve the effective config: optional file, then env, then explicit
    /// flag overrides.
    pub fn resolve(
        file: Option<&Path>,
        rpc_url: Option<String>,
        contract_address: Option<String>,
    ) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config = config.with_env_overrides();
        if let Some(url) = rpc_url {
            config.rpc_url = url;
        }
        if let Some(address) = contract_address {
            config.contract_address = address;
        }
        Ok(config)
    }
}
