//! API Documentation - Swagger UI
//!
//! Provides OpenAPI documentation at /docs

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::agents::{AgentStatus, AgentsResponse};
use super::health::HealthResponse;
use super::query::{QueryReply, QueryRequest};
use super::tasks::{TaskListResponse, TaskReply, TaskRequest};

/// Charon gateway OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Charon Gateway API",
        version = "1.0.0",
        description = "HTTP gateway in front of an opaque backend agent.

## Overview
Each Charon gateway fronts one agent kind and exposes:
- **Query**: free-form text dispatch with normalized replies
- **Tasks**: a fixed table of predefined task shortcuts
- **Agents**: liveness of the lazily constructed agent handle
- **Health**: process liveness probe

## Authentication
When an API token is configured, invocation endpoints require it:
```
X-Api-Token: <token>
```
"
    ),
    servers(
        (url = "/", description = "Local gateway")
    ),
    paths(
        crate::api::health::health_check,
        crate::api::query::run_query,
        crate::api::tasks::list_tasks,
        crate::api::tasks::run_task,
        crate::api::agents::list_agents,
    ),
    components(
        schemas(
            HealthResponse,
            QueryRequest,
            QueryReply,
            TaskListResponse,
            TaskReply,
            TaskRequest,
            AgentsResponse,
            AgentStatus,
        )
    ),
    tags(
        (name = "health", description = "Liveness probe"),
        (name = "query", description = "Free-form agent queries"),
        (name = "tasks", description = "Predefined task shortcuts"),
        (name = "agents", description = "Agent handle liveness"),
    )
)]
pub struct ApiDoc;

/// Create documentation routes
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
