//! Result rendering
//!
//! Pure functions from [`Task`] values to output shapes: the JSON object
//! consumed by agents and HTTP clients, the one-line summary, and the
//! terminal table/card views used by the CLI. No I/O here.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::Value;

use crate::task::{is_zero_address, Task, TaskStatus};

/// JSON object for one task, field names per the wire contract.
pub fn to_json(task: &Task) -> Value {
    serde_json::to_value(task).unwrap_or(Value::Null)
}

/// One-line summary used by the agent-facing summaries operation.
pub fn summary_line(task: &Task) -> String {
    format!(
        "Task #{} [{}]: {} - Reward: {} (raw {})",
        task.id, task.status, task.title, task.reward_display, task.reward_raw
    )
}

/// `0xa564...7D2E` shortening for terminal output.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

fn status_label(status: TaskStatus) -> colored::ColoredString {
    match status {
        TaskStatus::Available => "Available".blue(),
        TaskStatus::InProgress => "In Progress".yellow(),
        TaskStatus::Completed => "Completed".green(),
    }
}

/// Table view over a list of tasks.
pub fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Status", "Title", "Reward", "Worker", "Creator"]);

    for task in tasks {
        let worker = if is_zero_address(&task.worker) {
            "unassigned".to_string()
        } else {
            short_address(&task.worker)
        };
        table.add_row(vec![
            Cell::new(task.id),
            Cell::new(task.status),
            Cell::new(&task.title),
            Cell::new(&task.reward_display),
            Cell::new(worker),
            Cell::new(short_address(&task.creator)),
        ]);
    }
    table
}

/// Detailed card for a single task.
pub fn task_card(task: &Task) -> String {
    let worker = if is_zero_address(&task.worker) {
        "not assigned".to_string()
    } else {
        short_address(&task.worker)
    };
    format!(
        "{}\nTask #{}: {}  [{}]\n{}\nDescription: {}\nReward:      {} (raw {})\nCreator:     {}\nWorker:      {}\n{}",
        "=".repeat(70).dimmed(),
        task.id,
        task.title.bold(),
        status_label(task.status),
        "=".repeat(70).dimmed(),
        task.description,
        task.reward_display,
        task.reward_raw,
        short_address(&task.creator),
        worker,
        "=".repeat(70).dimmed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{RewardDisplay, ZERO_ADDRESS};

    fn sample(status: TaskStatus) -> Task {
        Task {
            id: 3,
            title: "Deploy release".to_string(),
            description: "push it".to_string(),
            reward_raw: "5000000000000000000".to_string(),
            reward_display: RewardDisplay::Scaled(5.0),
            completed: status == TaskStatus::Completed,
            worker: match status {
                TaskStatus::Available => ZERO_ADDRESS.to_string(),
                _ => "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
            },
            creator: "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB".to_string(),
            status,
        }
    }

    #[test]
    fn test_summary_line_format() {
        let line = summary_line(&sample(TaskStatus::InProgress));
        assert_eq!(
            line,
            "Task #3 [InProgress]: Deploy release - Reward: 5 (raw 5000000000000000000)"
        );
    }

    #[test]
    fn test_summary_line_raw_fallback() {
        let mut task = sample(TaskStatus::Available);
        task.reward_display = RewardDisplay::Raw(task.reward_raw.clone());
        let line = summary_line(&task);
        assert!(line.contains("Reward: 5000000000000000000 (raw 5000000000000000000)"));
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("0xa564E0967A252E813051Cb278BF84fE567617D2E"),
            "0xa564...7D2E"
        );
        assert_eq!(short_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_to_json_field_names() {
        let json = to_json(&sample(TaskStatus::Completed));
        for key in [
            "id",
            "title",
            "description",
            "rewardRaw",
            "rewardDisplay",
            "completed",
            "worker",
            "creator",
            "status",
        ] {
            assert!(json.get(key).is_some(), "missing field {}", key);
        }
    }

    #[test]
    fn test_table_marks_unassigned() {
        let table = task_table(&[sample(TaskStatus::Available)]);
        let rendered = table.to_string();
        assert!(rendered.contains("unassigned"));
        assert!(rendered.contains("Deploy release"));
    }
}
