//! Search command: substring match over titles and descriptions

use anyhow::Result;
use colored::Colorize;
use taskchain::{format, ContractLedger, TaskQueryEngine};

pub async fn run(
    engine: &TaskQueryEngine<ContractLedger>,
    query: &str,
    limit: usize,
    json: bool,
) -> Result<()> {
    let tasks = engine.search_tasks(query, limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("{}", format!("No tasks matching \"{}\".", query).dimmed());
        return Ok(());
    }

    println!("{}", format::task_table(&tasks));
    println!("{} match(es) for \"{}\"", tasks.len(), query);
    Ok(())
}
