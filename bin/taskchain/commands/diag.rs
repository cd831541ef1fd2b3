//! Diag command: probe the RPC endpoint and the deployed contract
//!
//! Walks the same checks the old connectivity script did: reach the node,
//! read the head block, confirm contract code is deployed, and exercise
//! both count accessors.

use anyhow::Result;
use colored::Colorize;
use taskchain::{ChainConfig, ContractLedger, TaskQueryEngine};

fn report(label: &str, outcome: std::result::Result<String, String>) -> bool {
    match outcome {
        Ok(detail) => {
            println!("  {} {:<22} {}", "ok".green(), label, detail);
            true
        }
        Err(error) => {
            println!("  {} {:<22} {}", "!!".red(), label, error);
            false
        }
    }
}

pub async fn run(engine: &TaskQueryEngine<ContractLedger>, config: &ChainConfig) -> Result<()> {
    let ledger = engine.ledger();
    let rpc = ledger.rpc();

    println!("RPC endpoint: {}", config.rpc_url);
    println!("Contract:     {}", config.contract_address);
    println!();

    let mut healthy = true;

    healthy &= report(
        "chain id",
        rpc.chain_id()
            .await
            .map(|id| id.to_string())
            .map_err(|e| e.to_string()),
    );

    healthy &= report(
        "head block",
        rpc.block_number()
            .await
            .map(|n| format!("#{}", n))
            .map_err(|e| e.to_string()),
    );

    healthy &= report(
        "contract code",
        rpc.get_code(&config.contract_address)
            .await
            .map_err(|e| e.to_string())
            .and_then(|code| {
                if code.is_empty() {
                    Err("no code at address".to_string())
                } else {
                    Ok(format!("{} bytes", code.len()))
                }
            }),
    );

    healthy &= report(
        "count (primary)",
        ledger.count_primary().await.map(|n| n.to_string()),
    );

    // Legacy accessor failing is fine as long as the primary answered.
    let legacy = ledger.count_legacy().await;
    match legacy {
        Ok(count) => {
            println!("  {} {:<22} {}", "ok".green(), "count (legacy)", count);
        }
        Err(error) => {
            println!("  {} {:<22} {}", "--".dimmed(), "count (legacy)", error.dimmed());
        }
    }

    println!();
    if healthy {
        println!("{}", "All probes passed.".green());
        Ok(())
    } else {
        anyhow::bail!("one or more probes failed");
    }
}
