//! Stats command: status counts for the whole board

use anyhow::Result;
use colored::Colorize;
use taskchain::{ContractLedger, TaskQueryEngine};

pub async fn run(engine: &TaskQueryEngine<ContractLedger>, json: bool) -> Result<()> {
    let stats = engine.task_stats().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Task Board".bold());
    println!();
    println!("  Total:       {}", stats.total);
    println!("  Available:   {}", stats.available.to_string().blue());
    println!("  In Progress: {}", stats.in_progress.to_string().yellow());
    println!("  Completed:   {}", stats.completed.to_string().green());
    Ok(())
}
