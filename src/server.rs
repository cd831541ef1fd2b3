//! HTTP query server
//!
//! Exposes the query engine as JSON endpoints for an agent or web layer:
//! - `GET /tasks?limit=`            list tasks
//! - `GET /tasks/active`            open tasks
//! - `GET /tasks/completed`         completed tasks
//! - `GET /tasks/:id`               one task
//! - `GET /tasks/creator/:address`  by creator
//! - `GET /tasks/worker/:address`   by worker
//! - `GET /search?q=&limit=`        substring search
//! - `GET /stats`                   status counts
//! - `GET /summaries?limit=`        one-line open-task summaries
//! - `GET /health`                  configuration and liveness
//!
//! Every request runs a fresh fetch pass; responses always reflect the
//! ledger at call time.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ChainConfig;
use crate::ledger::ContractLedger;
use crate::query::{QueryError, TaskQueryEngine, DEFAULT_SEARCH_LIMIT, DEFAULT_SUMMARY_LIMIT};

/// Server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8780,
        }
    }
}

/// Shared request state.
pub struct AppState {
    pub engine: TaskQueryEngine<ContractLedger>,
    pub chain: ChainConfig,
    pub started_at: DateTime<Utc>,
}

/// Task query HTTP server.
pub struct TaskQueryServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl TaskQueryServer {
    pub fn new(config: ServerConfig, engine: TaskQueryEngine<ContractLedger>, chain: ChainConfig) -> Self {
        Self {
            config,
            state: Arc::new(AppState {
                engine,
                chain,
                started_at: Utc::now(),
            }),
        }
    }

    /// Create the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/tasks", get(list_tasks))
            .route("/tasks/active", get(list_active))
            .route("/tasks/completed", get(list_completed))
            .route("/tasks/:id", get(get_task))
            .route("/tasks/creator/:address", get(list_by_creator))
            .route("/tasks/worker/:address", get(list_by_worker))
            .route("/search", get(search_tasks))
            .route("/stats", get(get_stats))
            .route("/summaries", get(get_summaries))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Start the server
    pub async fn start(&self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("task query server listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

// ==================== Request/Response Types ====================

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct SummaryParams {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    rpc_url: String,
    contract_address: String,
    started_at: DateTime<Utc>,
}

fn error_response(err: QueryError) -> (StatusCode, Json<ErrorBody>) {
    let status = match &err {
        QueryError::NotFound(_) => StatusCode::NOT_FOUND,
        QueryError::Ledger(_) => StatusCode::BAD_GATEWAY,
    };
    if status == StatusCode::BAD_GATEWAY {
        warn!("ledger failure: {}", err);
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

// ==================== Handlers ====================

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    match state.engine.list_tasks(params.limit).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.engine.get_task(id).await {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn list_active(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.engine.list_active_tasks().await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn list_completed(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.engine.list_completed_tasks().await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn list_by_creator(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    match state.engine.list_by_creator(&address).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn list_by_worker(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> impl IntoResponse {
    match state.engine.list_by_worker(&address).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn search_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let query = params.q.unwrap_or_default();
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    match state.engine.search_tasks(&query, limit).await {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.engine.task_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn get_summaries(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SummaryParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_SUMMARY_LIMIT);
    match state.engine.open_task_summaries(limit).await {
        Ok(lines) => (StatusCode::OK, Json(lines)).into_response(),
        Err(e) => error_response(e).into_response(),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        rpc_url: state.chain.rpc_url.clone(),
        contract_address: state.chain.contract_address.clone(),
        started_at: state.started_at,
    })
}
