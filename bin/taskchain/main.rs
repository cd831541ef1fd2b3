//! TaskChain CLI
//!
//! Inspect the on-chain task board from the terminal: list and filter
//! tasks, search, show status counts, and probe connectivity.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskchain::{
    ChainConfig, ContractLedger, TaskQueryEngine, DEFAULT_SEARCH_LIMIT, DEFAULT_SUMMARY_LIMIT,
};

use commands::list::Selection;

#[derive(Parser)]
#[command(name = "taskchain")]
#[command(about = "Inspect tasks on the TaskChain contract", version)]
struct Cli {
    /// JSON-RPC endpoint URL
    #[arg(long, env = "TASKCHAIN_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Task contract address
    #[arg(long, env = "TASKCHAIN_CONTRACT", global = true)]
    contract: Option<String>,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tasks in ascending id order
    List {
        /// Maximum number of tasks to show
        #[arg(long)]
        limit: Option<i64>,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one task by id
    Get {
        id: u64,
        #[arg(long)]
        json: bool,
    },
    /// List open tasks (available or in progress)
    Active {
        #[arg(long)]
        json: bool,
    },
    /// List completed tasks
    Completed {
        #[arg(long)]
        json: bool,
    },
    /// Tasks created by an address
    ByCreator {
        address: String,
        #[arg(long)]
        json: bool,
    },
    /// Tasks assigned to an address
    ByWorker {
        address: String,
        #[arg(long)]
        json: bool,
    },
    /// Substring search over titles and descriptions
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Status counts for the whole board
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// One-line summaries of open tasks
    Summaries {
        #[arg(long, default_value_t = DEFAULT_SUMMARY_LIMIT)]
        limit: usize,
    },
    /// Probe the RPC endpoint and contract
    Diag,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = ChainConfig::resolve(cli.config.as_deref(), cli.rpc_url, cli.contract)?;
    let ledger = ContractLedger::from_config(&config)?;
    let engine = TaskQueryEngine::new(ledger, config.fetch_concurrency);

    match cli.command {
        Commands::List { limit, json } => {
            commands::list::run(&engine, Selection::All { limit }, json).await
        }
        Commands::Get { id, json } => commands::get::run(&engine, id, json).await,
        Commands::Active { json } => commands::list::run(&engine, Selection::Active, json).await,
        Commands::Completed { json } => {
            commands::list::run(&engine, Selection::Completed, json).await
        }
        Commands::ByCreator { address, json } => {
            commands::list::run(&engine, Selection::Creator(address), json).await
        }
        Commands::ByWorker { address, json } => {
            commands::list::run(&engine, Selection::Worker(address), json).await
        }
        Commands::Search { query, limit, json } => {
            commands::search::run(&engine, &query, limit, json).await
        }
        Commands::Stats { json } => commands::stats::run(&engine, json).await,
        Commands::Summaries { limit } => commands::summaries::run(&engine, limit).await,
        Commands::Diag => commands::diag::run(&engine, &config).await,
    }
}
