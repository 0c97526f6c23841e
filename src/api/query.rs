//! Query endpoint
//!
//! `POST /query` hands free-form text to the fronted agent, normalizes
//! whatever comes back, and echoes the query and wall-clock time.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use charon_agents::{Agent, AgentKind, RawResponse};
use charon_core::{execute_with_retry, normalize, BlockingBridge, Error, NormalizedResult};

use super::{round_secs, ApiError, GatewayState};
use crate::middleware::auth::RequireToken;

/// A query for the fronted agent
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct QueryRequest {
    /// Free-form text handed to the agent
    pub query: String,
    /// Conversation continuity token (supervisor)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Reply to a query
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryReply {
    /// Normalized agent response
    #[schema(value_type = Object)]
    pub result: NormalizedResult,
    /// Wall-clock seconds spent, rounded to two decimals
    pub execution_time: f64,
    /// The query, echoed
    pub query: String,
    /// Session id (supervisor replies only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Dispatch a query to the fronted agent
#[utoipa::path(
    post,
    path = "/query",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Normalized agent reply", body = QueryReply),
        (status = 400, description = "Empty query"),
        (status = 401, description = "Missing or invalid API token"),
        (status = 500, description = "Agent failure"),
        (status = 504, description = "Agent did not answer in time"),
    )
)]
pub async fn run_query(
    _token: RequireToken,
    Extension(state): Extension<Arc<GatewayState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryReply>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(Error::InvalidQuery("Query cannot be empty".to_string()).into());
    }

    // Supervisor conversations carry a session id across requests.
    let session_id = if state.kind == AgentKind::Supervisor {
        Some(
            request
                .session_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        )
    } else {
        None
    };

    let started = Instant::now();
    let raw = invoke_agent(&state, &request.query, session_id.as_deref()).await?;
    let result = normalize(&raw);
    let execution_time = round_secs(started.elapsed().as_secs_f64());

    info!(
        agent = state.kind.as_str(),
        kind = result.kind(),
        execution_time,
        "Query completed"
    );

    Ok(Json(QueryReply {
        result,
        execution_time,
        query: request.query,
        session_id,
    }))
}

/// Resolve the agent handle and run one invocation through the bridge,
/// under the retry wrapper when one is configured.
pub(crate) async fn invoke_agent(
    state: &GatewayState,
    text: &str,
    session_id: Option<&str>,
) -> charon_core::Result<RawResponse> {
    let agent = state.registry.resolve(state.kind.as_str()).await?;
    let text = text.to_string();
    let session = session_id.map(str::to_string);

    match &state.retry {
        Some(policy) => {
            execute_with_retry(policy, || {
                let agent = agent.clone();
                let text = text.clone();
                let session = session.clone();
                async move { call_once(&state.bridge, agent, text, session).await }
            })
            .await
        }
        None => call_once(&state.bridge, agent, text, session).await,
    }
}

async fn call_once(
    bridge: &BlockingBridge,
    agent: Arc<dyn Agent>,
    text: String,
    session: Option<String>,
) -> charon_core::Result<RawResponse> {
    let outcome = bridge
        .run(move || agent.chat(&text, session.as_deref()))
        .await?;
    Ok(outcome?)
}

/// Create query routes
pub fn query_routes() -> Router {
    Router::new().route("/query", post(run_query))
}
