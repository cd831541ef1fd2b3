//! TaskChain - query surface over an on-chain task board
//!
//! Reads the deployed task contract and serves a consistent set of query
//! operations over its records: list, filter, search, aggregate,
//! summarize. The contract has gone through two record layouts; both are
//! normalized into one canonical task shape with a derived lifecycle
//! status.
//!
//! ## Module Structure
//!
//! - `abi`: minimal ABI codec for the contract's return types
//! - `rpc`: JSON-RPC transport (`eth_call` and friends)
//! - `ledger`: the `LedgerClient` seam and its contract-backed impl
//! - `task`: canonical task model and record normalization
//! - `query`: the stateless query engine
//! - `format`: JSON / summary-line / terminal rendering
//! - `config`: chain configuration (defaults, TOML file, env overrides)
//! - `server`: axum HTTP server exposing the query surface

/// Minimal ABI codec
pub mod abi;

/// Chain configuration
pub mod config;

/// Result rendering
pub mod format;

/// Ledger client seam
pub mod ledger;

/// Task query engine
pub mod query;

/// JSON-RPC transport
pub mod rpc;

/// HTTP query server
pub mod server;

/// Canonical task model and normalization
pub mod task;

pub use config::ChainConfig;
pub use ledger::{ContractLedger, LedgerClient, LedgerError};
pub use query::{
    FetchOutcome, QueryError, TaskQueryEngine, TaskStats, DEFAULT_SEARCH_LIMIT,
    DEFAULT_SUMMARY_LIMIT,
};
pub use rpc::{EthRpcClient, RpcError};
pub use server::{ServerConfig, TaskQueryServer};
pub use task::{
    is_zero_address, normalize, RawRecord, RecordLayout, RewardDisplay, Task, TaskStatus,
    ZERO_ADDRESS,
};
