//! List-style commands: full board, open/completed filters, by-address

use anyhow::Result;
use colored::Colorize;
use taskchain::{format, ContractLedger, Task, TaskQueryEngine};

/// Which slice of the board to list.
pub enum Selection {
    All { limit: Option<i64> },
    Active,
    Completed,
    Creator(String),
    Worker(String),
}

pub async fn run(
    engine: &TaskQueryEngine<ContractLedger>,
    selection: Selection,
    json: bool,
) -> Result<()> {
    let tasks: Vec<Task> = match &selection {
        Selection::All { limit } => engine.list_tasks(*limit).await?,
        Selection::Active => engine.list_active_tasks().await?,
        Selection::Completed => engine.list_completed_tasks().await?,
        Selection::Creator(address) => engine.list_by_creator(address).await?,
        Selection::Worker(address) => engine.list_by_worker(address).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return Ok(());
    }

    println!("{}", format::task_table(&tasks));
    println!("{} task(s)", tasks.len());
    Ok(())
}
