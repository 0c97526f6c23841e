//! Agent liveness endpoint
//!
//! `GET /agents` reports whether the fronted agent handle has been
//! constructed. Listing never triggers construction; a gateway that
//! has served no queries yet reports `inactive`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use utoipa::ToSchema;

use super::GatewayState;

/// Liveness of one agent handle
#[derive(Debug, Serialize, ToSchema)]
pub struct AgentStatus {
    /// "active" once the handle is constructed, else "inactive"
    pub status: &'static str,
}

/// Liveness map keyed by agent name
#[derive(Debug, Serialize, ToSchema)]
pub struct AgentsResponse {
    /// Agent name to status
    pub agents: HashMap<String, AgentStatus>,
}

/// List agent handles and their liveness
#[utoipa::path(
    get,
    path = "/agents",
    tag = "agents",
    responses((status = 200, description = "Liveness map", body = AgentsResponse))
)]
pub async fn list_agents(Extension(state): Extension<Arc<GatewayState>>) -> Json<AgentsResponse> {
    let agents = state
        .registry
        .ids()
        .into_iter()
        .map(|id| {
            let status = if state.registry.is_constructed(id) {
                "active"
            } else {
                "inactive"
            };
            (id.to_string(), AgentStatus { status })
        })
        .collect();
    Json(AgentsResponse { agents })
}

/// Create agent liveness routes
pub fn agents_routes() -> Router {
    Router::new().route("/agents", get(list_agents))
}
