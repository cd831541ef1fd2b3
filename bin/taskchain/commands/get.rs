//! Get command: show a single task

use anyhow::{bail, Result};
use taskchain::{format, ContractLedger, QueryError, TaskQueryEngine};

pub async fn run(engine: &TaskQueryEngine<ContractLedger>, id: u64, json: bool) -> Result<()> {
    match engine.get_task(id).await {
        Ok(task) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("{}", format::task_card(&task));
            }
            Ok(())
        }
        Err(QueryError::NotFound(id)) => bail!("task #{} not found", id),
        Err(e) => Err(e.into()),
    }
}
