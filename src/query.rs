//! Task query engine
//!
//! Every operation performs a full fetch-and-normalize pass over the id
//! range and applies its own filter or aggregation. Nothing is cached
//! between calls: each response reflects the ledger at call time.
//!
//! The full-range pass fans out per-id fetches with bounded concurrency.
//! `buffered` keeps results in submission order, so tasks always come back
//! ascending by id. Dropping an operation future aborts the in-flight
//! fetches; partial results are discarded with it.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::format;
use crate::ledger::{LedgerClient, LedgerError};
use crate::task::{normalize, Task, TaskStatus};

/// Default result cap for [`TaskQueryEngine::search_tasks`].
pub const DEFAULT_SEARCH_LIMIT: usize = 25;

/// Default result cap for [`TaskQueryEngine::open_task_summaries`].
pub const DEFAULT_SUMMARY_LIMIT: usize = 20;

/// Query failure: only total ledger unreachability or a missing single id.
/// List operations never fail for data reasons.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("task {0} not found")]
    NotFound(u64),
}

/// Outcome of one per-id fetch during a full-range pass. Gaps are an
/// expected consequence of ledger evolution, so a skip is data, not an
/// error.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(Task),
    Skipped { id: u64, reason: String },
}

/// Aggregate counts over the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub available: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Stateless query surface over a [`LedgerClient`].
pub struct TaskQueryEngine<L: LedgerClient> {
    ledger: L,
    fetch_concurrency: usize,
}

impl<L: LedgerClient> TaskQueryEngine<L> {
    pub fn new(ledger: L, fetch_concurrency: usize) -> Self {
        Self {
            ledger,
            fetch_concurrency: fetch_concurrency.max(1),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // ==================== Operations ====================

    /// First `limit` tasks ascending by id. `None` means all; negative
    /// limits clamp to zero.
    pub async fn list_tasks(&self, limit: Option<i64>) -> Result<Vec<Task>, QueryError> {
        let tasks = self.fetch_all().await?;
        match limit {
            Some(limit) => {
                let cap = usize::try_from(limit).unwrap_or(0);
                Ok(tasks.into_iter().take(cap).collect())
            }
            None => Ok(tasks),
        }
    }

    /// Exactly one record. The only operation with a not-found outcome.
    pub async fn get_task(&self, id: u64) -> Result<Task, QueryError> {
        match self.ledger.record_at(id).await {
            Ok(raw) => Ok(normalize(&raw)),
            Err(LedgerError::Reverted { .. }) => Err(QueryError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Tasks still open for work (Available or InProgress).
    pub async fn list_active_tasks(&self) -> Result<Vec<Task>, QueryError> {
        let tasks = self.fetch_all().await?;
        Ok(tasks.into_iter().filter(|t| t.status.is_open()).collect())
    }

    /// Tasks already completed.
    pub async fn list_completed_tasks(&self) -> Result<Vec<Task>, QueryError> {
        let tasks = self.fetch_all().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .collect())
    }

    /// Tasks created by `address` (case-insensitive).
    pub async fn list_by_creator(&self, address: &str) -> Result<Vec<Task>, QueryError> {
        let tasks = self.fetch_all().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.matches_creator(address))
            .collect())
    }

    /// Tasks assigned to `address` (case-insensitive).
    pub async fn list_by_worker(&self, address: &str) -> Result<Vec<Task>, QueryError> {
        let tasks = self.fetch_all().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.matches_worker(address))
            .collect())
    }

    /// Case-insensitive substring search over title and description.
    /// A blank query matches nothing rather than everything.
    pub async fn search_tasks(&self, query: &str, limit: usize) -> Result<Vec<Task>, QueryError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let tasks = self.fetch_all().await?;
        Ok(tasks
            .into_iter()
            .filter(|t| {
                format!("{} {}", t.title, t.description)
                    .to_lowercase()
                    .contains(&needle)
            })
            .take(limit)
            .collect())
    }

    /// Status counts. `available + in_progress + completed == total` holds
    /// by construction.
    pub async fn task_stats(&self) -> Result<TaskStats, QueryError> {
        let tasks = self.fetch_all().await?;
        let mut stats = TaskStats {
            total: tasks.len(),
            available: 0,
            in_progress: 0,
            completed: 0,
        };
        for task in &tasks {
            match task.status {
                TaskStatus::Available => stats.available += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }
        Ok(stats)
    }

    /// One-line renderings of up to `limit` open tasks.
    pub async fn open_task_summaries(&self, limit: usize) -> Result<Vec<String>, QueryError> {
        let tasks = self.list_active_tasks().await?;
        Ok(tasks
            .iter()
            .take(limit)
            .map(format::summary_line)
            .collect())
    }

    // ==================== Full-range fetch ====================

    /// Shared fetch pass: count, then fan out `1..=count` with bounded
    /// concurrency, normalizing successes and skipping failed ids.
    async fn fetch_all(&self) -> Result<Vec<Task>, QueryError> {
        let count = self.ledger.record_count().await?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let outcomes: Vec<FetchOutcome> = stream::iter(1..=count)
            .map(|id| self.fetch_one(id))
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        let mut tasks = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Fetched(task) => tasks.push(task),
                FetchOutcome::Skipped { id, reason } => {
                    debug!("skipping record {}: {}", id, reason);
                }
            }
        }
        Ok(tasks)
    }

    async fn fetch_one(&self, id: u64) -> FetchOutcome {
        match self.ledger.record_at(id).await {
            Ok(raw) => FetchOutcome::Fetched(normalize(&raw)),
            Err(e) => FetchOutcome::Skipped {
                id,
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::{RawValue, Word};
    use crate::task::{RawRecord, ZERO_ADDRESS};
    use async_trait::async_trait;
    use std::collections::HashMap;

    const ALICE: &str = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
    const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    /// In-memory ledger double: records keyed by id; missing ids revert.
    struct FakeLedger {
        count: u64,
        records: HashMap<u64, RawRecord>,
        count_fails: bool,
    }

    impl FakeLedger {
        fn new(count: u64) -> Self {
            Self {
                count,
                records: HashMap::new(),
                count_fails: false,
            }
        }

        fn insert(
            &mut self,
            id: u64,
            title: &str,
            description: &str,
            reward: u128,
            completed: bool,
            worker: &str,
            creator: &str,
        ) {
            self.records.insert(
                id,
                RawRecord(vec![
                    RawValue::Uint(Word::from_u64(id)),
                    RawValue::Str(title.to_string()),
                    RawValue::Str(description.to_string()),
                    RawValue::Uint(Word::from_u128(reward)),
                    RawValue::Bool(completed),
                    RawValue::Address(worker.to_string()),
                    RawValue::Address(creator.to_string()),
                ]),
            );
        }
    }

    #[async_trait]
    impl LedgerClient for FakeLedger {
        async fn record_count(&self) -> Result<u64, LedgerError> {
            if self.count_fails {
                return Err(LedgerError::CountUnavailable {
                    primary: "boom".to_string(),
                    legacy: "boom".to_string(),
                });
            }
            Ok(self.count)
        }

        async fn record_at(&self, id: u64) -> Result<RawRecord, LedgerError> {
            self.records
                .get(&id)
                .cloned()
                .ok_or(LedgerError::Reverted { id })
        }
    }

    fn board() -> TaskQueryEngine<FakeLedger> {
        // 1: available, 2: gap, 3: completed, 4: in progress
        let mut ledger = FakeLedger::new(4);
        ledger.insert(1, "Paint", "fence, white", 10u128.pow(18), false, ZERO_ADDRESS, ALICE);
        ledger.insert(3, "Deploy", "push release", 2 * 10u128.pow(18), true, BOB, ALICE);
        ledger.insert(4, "Audit", "review contract", 10u128.pow(17), false, BOB, ALICE);
        TaskQueryEngine::new(ledger, 4)
    }

    #[tokio::test]
    async fn test_list_tasks_skips_gaps_in_order() {
        let engine = board();
        let tasks = engine.list_tasks(None).await.unwrap();
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn test_list_tasks_limit_clamping() {
        let engine = board();
        assert_eq!(engine.list_tasks(Some(-5)).await.unwrap().len(), 0);
        assert_eq!(engine.list_tasks(Some(0)).await.unwrap().len(), 0);
        assert_eq!(engine.list_tasks(Some(2)).await.unwrap().len(), 2);
        assert_eq!(engine.list_tasks(Some(100)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_gap_mid_range_with_stats() {
        // count=3; id 1 available, id 2 reverts, id 3 completed
        let mut ledger = FakeLedger::new(3);
        ledger.insert(1, "One", "first", 0, false, ZERO_ADDRESS, ALICE);
        ledger.insert(3, "Three", "third", 0, true, BOB, ALICE);
        let engine = TaskQueryEngine::new(ledger, 2);

        let tasks = engine.list_tasks(None).await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].status, TaskStatus::Available);
        assert_eq!(tasks[1].id, 3);
        assert_eq!(tasks[1].status, TaskStatus::Completed);

        let stats = engine.task_stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.available, 1);
        assert_eq!(stats.in_progress, 0);
        assert_eq!(stats.completed, 1);
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let engine = board();
        let err = engine.get_task(2).await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(2)));

        let task = engine.get_task(3).await.unwrap();
        assert_eq!(task.title, "Deploy");
    }

    #[tokio::test]
    async fn test_active_and_completed_partition() {
        let engine = board();
        let active = engine.list_active_tasks().await.unwrap();
        assert_eq!(
            active.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 4]
        );

        let completed = engine.list_completed_tasks().await.unwrap();
        assert_eq!(completed.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3]);
    }

    #[tokio::test]
    async fn test_filter_by_address_case_insensitive() {
        let engine = board();
        let by_worker = engine
            .list_by_worker(&BOB.to_uppercase().replace("0X", "0x"))
            .await
            .unwrap();
        assert_eq!(by_worker.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 4]);

        let by_creator = engine.list_by_creator(&ALICE.to_lowercase()).await.unwrap();
        assert_eq!(by_creator.len(), 3);

        let none = engine.list_by_creator(BOB).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_search_blank_query_is_empty() {
        let engine = board();
        assert!(engine.search_tasks("", 10).await.unwrap().is_empty());
        assert!(engine.search_tasks("   ", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_title_and_description() {
        let engine = board();
        let hits = engine.search_tasks("CONTRACT", 10).await.unwrap();
        assert_eq!(hits.iter().map(|t| t.id).collect::<Vec<_>>(), vec![4]);

        let hits = engine.search_tasks("paint", 10).await.unwrap();
        assert_eq!(hits.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1]);

        let limited = engine.search_tasks("e", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_board() {
        let engine = TaskQueryEngine::new(FakeLedger::new(0), 4);
        assert!(engine.list_tasks(None).await.unwrap().is_empty());
        let stats = engine.task_stats().await.unwrap();
        assert_eq!(stats.total, 0);
    }

    #[tokio::test]
    async fn test_count_failure_is_fatal() {
        let mut ledger = FakeLedger::new(2);
        ledger.count_fails = true;
        let engine = TaskQueryEngine::new(ledger, 4);
        let err = engine.list_tasks(None).await.unwrap_err();
        assert!(matches!(
            err,
            QueryError::Ledger(LedgerError::CountUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_summaries_open_only() {
        let engine = board();
        let lines = engine.open_task_summaries(10).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Task #1 [Available]: Paint"));
        assert!(lines[1].starts_with("Task #4 [InProgress]: Audit"));

        let capped = engine.open_task_summaries(1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_ordering_under_concurrency() {
        let mut ledger = FakeLedger::new(50);
        for id in 1..=50 {
            ledger.insert(id, "t", "d", 0, false, ZERO_ADDRESS, ALICE);
        }
        let engine = TaskQueryEngine::new(ledger, 16);
        let tasks = engine.list_tasks(None).await.unwrap();
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, (1..=50).collect::<Vec<_>>());
    }
}
