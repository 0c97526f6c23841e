//! Predefined task endpoints
//!
//! `GET /tasks` lists the gateway's fixed task table;
//! `POST /tasks/{key}` runs one task through the agent's task
//! capability. Unknown keys get a 404 that names the valid keys.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Extension, Path};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use charon_agents::predefined_tasks;
use charon_core::{normalize, Error, NormalizedResult};

use super::{round_secs, ApiError, GatewayState};
use crate::middleware::auth::RequireToken;

/// The gateway's fixed task table
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    /// Task key to description
    pub tasks: BTreeMap<String, String>,
    /// Number of tasks
    pub count: usize,
}

/// Optional body for a task execution
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TaskRequest {
    /// Session to continue, if the caller has one
    pub session_id: Option<String>,
}

/// Reply to a task execution
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskReply {
    /// Normalized agent response
    #[schema(value_type = Object)]
    pub result: NormalizedResult,
    /// Wall-clock seconds spent, rounded to two decimals
    pub execution_time: f64,
    /// The task key, echoed
    pub task: String,
    /// The task's description
    pub task_description: String,
}

/// List the predefined tasks this gateway exposes
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "Task table", body = TaskListResponse),
        (status = 401, description = "Missing or invalid API token"),
    )
)]
pub async fn list_tasks(
    _token: RequireToken,
    Extension(state): Extension<Arc<GatewayState>>,
) -> Json<TaskListResponse> {
    let tasks: BTreeMap<String, String> = predefined_tasks(state.kind)
        .into_iter()
        .map(|t| (t.key, t.description))
        .collect();
    let count = tasks.len();
    Json(TaskListResponse { tasks, count })
}

/// Run one predefined task
#[utoipa::path(
    post,
    path = "/tasks/{key}",
    tag = "tasks",
    params(("key" = String, Path, description = "Task key")),
    request_body(content = TaskRequest, description = "Optional session to continue"),
    responses(
        (status = 200, description = "Normalized task reply", body = TaskReply),
        (status = 401, description = "Missing or invalid API token"),
        (status = 404, description = "Unknown task key"),
        (status = 500, description = "Agent failure"),
    )
)]
pub async fn run_task(
    _token: RequireToken,
    Extension(state): Extension<Arc<GatewayState>>,
    Path(key): Path<String>,
    body: Option<Json<TaskRequest>>,
) -> Result<Json<TaskReply>, ApiError> {
    let table = predefined_tasks(state.kind);
    let task = table
        .iter()
        .find(|t| t.key == key)
        .ok_or_else(|| Error::UnknownTask {
            key: key.clone(),
            valid: table.iter().map(|t| t.key.clone()).collect(),
        })?;
    let session_id = body.and_then(|Json(b)| b.session_id);

    let started = Instant::now();
    let agent = state.registry.resolve(state.kind.as_str()).await?;
    let task_key = task.key.clone();
    let raw = {
        let agent = agent.clone();
        let key = task_key.clone();
        let outcome = state
            .bridge
            .run(move || agent.execute_predefined_task(&key, session_id.as_deref()))
            .await?;
        outcome.map_err(charon_core::Error::from)?
    };
    let result = normalize(&raw);
    let execution_time = round_secs(started.elapsed().as_secs_f64());

    info!(
        agent = state.kind.as_str(),
        task = task_key.as_str(),
        execution_time,
        "Task completed"
    );

    Ok(Json(TaskReply {
        result,
        execution_time,
        task: task_key,
        task_description: task.description.clone(),
    }))
}

/// Create task routes
pub fn tasks_routes() -> Router {
    Router::new()
        .route("/tasks", get(list_tasks))
        .route("/tasks/:key", post(run_task))
}
