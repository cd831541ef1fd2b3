//! TaskChain Query Server
//!
//! Runs the task query surface as a standalone HTTP server for agents and
//! web frontends.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use taskchain::{ChainConfig, ContractLedger, ServerConfig, TaskQueryEngine, TaskQueryServer};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "taskchain-server")]
#[command(about = "TaskChain HTTP query server")]
struct Args {
    /// Server port
    #[arg(short, long, default_value = "8780", env = "TASKCHAIN_PORT")]
    port: u16,

    /// Server host
    #[arg(long, default_value = "0.0.0.0", env = "TASKCHAIN_HOST")]
    host: String,

    /// JSON-RPC endpoint URL
    #[arg(long, env = "TASKCHAIN_RPC_URL")]
    rpc_url: Option<String>,

    /// Task contract address
    #[arg(long, env = "TASKCHAIN_CONTRACT")]
    contract: Option<String>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("taskchain=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .init();

    let args = Args::parse();

    let chain = ChainConfig::resolve(args.config.as_deref(), args.rpc_url, args.contract)?;

    info!("Starting TaskChain query server");
    info!("  RPC endpoint: {}", chain.rpc_url);
    info!("  Contract: {}", chain.contract_address);
    info!("  Listening on: {}:{}", args.host, args.port);

    let ledger = ContractLedger::from_config(&chain)?;
    let engine = TaskQueryEngine::new(ledger, chain.fetch_concurrency);

    let server = TaskQueryServer::new(
        ServerConfig {
            host: args.host,
            port: args.port,
        },
        engine,
        chain,
    );

    server.start().await
}
