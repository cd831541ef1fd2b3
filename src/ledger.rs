//! Ledger client seam
//!
//! [`LedgerClient`] is the boundary the query engine talks through: a
//! record count and a per-id record fetch. [`ContractLedger`] is the
//! contract-backed implementation; tests substitute in-memory doubles.
//!
//! The client object is built once from [`ChainConfig`] and passed by
//! reference into the engine.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::abi::{
    decode_fields, decode_uint, encode_call, AbiError, Word, SEL_GET_TASK, SEL_GET_TASKS_COUNT,
    SEL_TASK_COUNTER,
};
use crate::config::ChainConfig;
use crate::rpc::{EthRpcClient, RpcError};
use crate::task::{RawRecord, RecordLayout};

/// Ledger access failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The node cannot be reached at all. Fatal to the whole operation.
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    /// Both count accessors failed. Fatal to the whole operation.
    #[error("record count unavailable (primary: {primary}; legacy: {legacy})")]
    CountUnavailable { primary: String, legacy: String },

    /// The per-id call reverted - a gap in the id range.
    #[error("record {id} reverted")]
    Reverted { id: u64 },

    /// The per-id call failed at the transport level.
    #[error("record {id} fetch failed: {message}")]
    Fetch { id: u64, message: String },

    /// Return data matched none of the known record layouts.
    #[error("record {id} could not be decoded: {source}")]
    Decode {
        id: u64,
        #[source]
        source: AbiError,
    },
}

/// Read access to the on-chain task ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Total number of records ever created (ids are `1..=count`).
    async fn record_count(&self) -> Result<u64, LedgerError>;

    /// Fetch one record by id. Reverts and decode mismatches surface as
    /// per-id errors the caller may treat as gaps.
    async fn record_at(&self, id: u64) -> Result<RawRecord, LedgerError>;
}

/// [`LedgerClient`] backed by the deployed task contract.
pub struct ContractLedger {
    rpc: EthRpcClient,
    contract: String,
}

impl ContractLedger {
    pub fn new(rpc: EthRpcClient, contract_address: &str) -> Self {
        Self {
            rpc,
            contract: contract_address.to_string(),
        }
    }

    pub fn from_config(config: &ChainConfig) -> Result<Self, LedgerError> {
        let rpc = EthRpcClient::new(config).map_err(|e| LedgerError::Unreachable(e.to_string()))?;
        Ok(Self::new(rpc, &config.contract_address))
    }

    pub fn contract_address(&self) -> &str {
        &self.contract
    }

    /// Underlying transport, for connectivity diagnostics.
    pub fn rpc(&self) -> &EthRpcClient {
        &self.rpc
    }

    /// Count via the current accessor only.
    pub async fn count_primary(&self) -> Result<u64, String> {
        self.call_count(SEL_GET_TASKS_COUNT).await
    }

    /// Count via the legacy accessor only.
    pub async fn count_legacy(&self) -> Result<u64, String> {
        self.call_count(SEL_TASK_COUNTER).await
    }

    async fn call_count(&self, selector: [u8; 4]) -> Result<u64, String> {
        let calldata = encode_call(selector, &[]);
        let data = self
            .rpc
            .call(&self.contract, &calldata)
            .await
            .map_err(|e| e.to_string())?;
        let word = decode_uint(&data).map_err(|e| e.to_string())?;
        word.as_u64().ok_or_else(|| "count exceeds u64".to_string())
    }
}

#[async_trait]
impl LedgerClient for ContractLedger {
    async fn record_count(&self) -> Result<u64, LedgerError> {
        match self.count_primary().await {
            Ok(count) => Ok(count),
            Err(primary) => {
                warn!("primary count accessor failed ({}), trying legacy", primary);
                match self.count_legacy().await {
                    Ok(count) => Ok(count),
                    Err(legacy) => Err(LedgerError::CountUnavailable { primary, legacy }),
                }
            }
        }
    }

    async fn record_at(&self, id: u64) -> Result<RawRecord, LedgerError> {
        let calldata = encode_call(SEL_GET_TASK, &[Word::from_u64(id)]);
        let data = self
            .rpc
            .call(&self.contract, &calldata)
            .await
            .map_err(|e| classify_fetch_error(id, e))?;
        decode_record(&data, id)
    }
}

fn classify_fetch_error(id: u64, error: RpcError) -> LedgerError {
    if error.is_revert() {
        LedgerError::Reverted { id }
    } else {
        LedgerError::Fetch {
            id,
            message: error.to_string(),
        }
    }
}

/// Decode return data against the known layouts in fixed order: v2 first,
/// v1 as the legacy fallback.
fn decode_record(data: &[u8], id: u64) -> Result<RawRecord, LedgerError> {
    let mut last_error = AbiError::Empty;
    for layout in RecordLayout::DECODE_ORDER {
        match decode_fields(data, layout.fields()) {
            Ok(values) => {
                debug!("record {} decoded as {:?}", id, layout);
                return Ok(RawRecord(values));
            }
            Err(e) => last_error = e,
        }
    }
    Err(LedgerError::Decode {
        id,
        source: last_error,
    })
}
