//! JSON-RPC transport to the ledger node
//!
//! Thin HTTP client for the handful of read-only methods the crate needs:
//! `eth_call`, `eth_blockNumber`, `eth_chainId`, `eth_getCode`. No signing,
//! no gas estimation, no websockets.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ChainConfig;

/// RPC transport failure taxonomy.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

impl RpcError {
    /// Whether the node reported an execution revert (nonexistent id,
    /// failed require) rather than a transport-level problem.
    pub fn is_revert(&self) -> bool {
        match self {
            RpcError::Rpc { code, message } => {
                *code == 3 || message.to_ascii_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// HTTP JSON-RPC client for an Ethereum-style node.
pub struct EthRpcClient {
    client: Client,
    url: String,
}

impl EthRpcClient {
    pub fn new(config: &ChainConfig) -> Result<Self, RpcError> {
        Self::with_timeout(&config.rpc_url, config.request_timeout_secs)
    }

    pub fn with_timeout(url: &str, timeout_secs: u64) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        debug!("rpc request: {}", method);
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let resp = self.client.post(&self.url).json(&body).send().await?;
        if !resp.status().is_success() {
            return Err(RpcError::HttpStatus(resp.status()));
        }

        let reply: RpcResponse = resp.json().await?;
        if let Some(err) = reply.error {
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        reply
            .result
            .ok_or_else(|| RpcError::Malformed("missing result field".to_string()))
    }

    /// `eth_call` against a contract; returns the raw return data.
    pub async fn call(&self, to: &str, calldata: &str) -> Result<Vec<u8>, RpcError> {
        let result = self
            .request(
                "eth_call",
                json!([{ "to": to, "data": calldata }, "latest"]),
            )
            .await?;
        decode_hex_blob(&result)
    }

    /// Current head block number.
    pub async fn block_number(&self) -> Result<u64, RpcError> {
        let result = self.request("eth_blockNumber", json!([])).await?;
        decode_quantity(&result)
    }

    /// Chain id of the connected network.
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let result = self.request("eth_chainId", json!([])).await?;
        decode_quantity(&result)
    }

    /// Deployed bytecode at an address; empty means no contract there.
    pub async fn get_code(&self, address: &str) -> Result<Vec<u8>, RpcError> {
        let result = self
            .request("eth_getCode", json!([address, "latest"]))
            .await?;
        decode_hex_blob(&result)
    }
}

/// Parse a `0x`-prefixed byte blob result.
fn decode_hex_blob(value: &Value) -> Result<Vec<u8>, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::Malformed(format!("expected hex string, got {}", value)))?;
    let stripped = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(stripped).map_err(|e| RpcError::Malformed(format!("bad hex payload: {}", e)))
}

/// Parse a `0x`-prefixed quantity result.
fn decode_quantity(value: &Value) -> Result<u64, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::Malformed(format!("expected quantity string, got {}", value)))?;
    let stripped = text.strip_prefix("0x").unwrap_or(text);
    u64::from_str_radix(stripped, 16)
        .map_err(|e| RpcError::Malformed(format!("bad quantity {}: {}", text, e)))
}
