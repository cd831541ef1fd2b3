//! Summaries command: one-line renderings of open tasks

use anyhow::Result;
use colored::Colorize;
use taskchain::{ContractLedger, TaskQueryEngine};

pub async fn run(engine: &TaskQueryEngine<ContractLedger>, limit: usize) -> Result<()> {
    let lines = engine.open_task_summaries(limit).await?;

    if lines.is_empty() {
        println!("{}", "No open tasks.".dimmed());
        return Ok(());
    }

    for line in lines {
        println!("{}", line);
    }
    Ok(())
}
