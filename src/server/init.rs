//! Gateway initialization and run loop

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Extension;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use charon_agents::{Agent, AgentKind, RemoteAgent, Route, ScriptedAgent, SupervisorAgent};
use charon_core::{AgentFactory, AgentRegistry, BlockingBridge};

use super::config::AppConfig;
use super::loader::load_config;
use crate::api::{gateway_router, GatewayState};
use crate::middleware::auth::ExpectedToken;

/// Run one gateway server
pub async fn run(kind: AgentKind, port_override: Option<u16>) -> Result<()> {
    info!("Starting Charon v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!("Configuration loaded");

    let settings = config.agent(kind);
    let port = port_override.unwrap_or(settings.port);

    let state = Arc::new(GatewayState {
        kind,
        registry: build_registry(kind, &config),
        bridge: BlockingBridge::new(settings.workers),
        retry: (kind == AgentKind::Supervisor).then(|| config.retry.to_policy()),
    });

    let app = gateway_router(state)
        .layer(Extension(Arc::new(ExpectedToken(
            config.auth.api_token.clone(),
        ))))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, port)
        .parse()
        .context("Invalid listen address")?;

    info!(agent = kind.as_str(), %addr, "Gateway listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listen address")?;
    axum::serve(listener, app)
        .await
        .context("Gateway server exited")
}

/// Build the registry for a kind. The agent itself is constructed on
/// first use, not here.
fn build_registry(kind: AgentKind, config: &AppConfig) -> AgentRegistry {
    let factory: AgentFactory = match kind {
        AgentKind::Supervisor => supervisor_factory(config),
        other => {
            let backend_url = config.agent(other).backend_url;
            let token = config.auth.api_token.clone();
            if backend_url.is_empty() {
                warn!(
                    agent = other.as_str(),
                    "No backend_url configured, serving the echo stub"
                );
            }
            Box::new(move || {
                if backend_url.is_empty() {
                    Ok(Arc::new(ScriptedAgent::new(other.as_str())) as Arc<dyn Agent>)
                } else {
                    let mut agent = RemoteAgent::new(other.as_str(), backend_url.clone())?;
                    if let Some(token) = &token {
                        agent = agent.with_api_token(token.clone());
                    }
                    Ok(Arc::new(agent) as Arc<dyn Agent>)
                }
            })
        }
    };

    AgentRegistry::new().register(kind.as_str(), factory)
}

/// The supervisor fronts the other three gateways, picking a route by
/// keyword. The first route is the fallback for unmatched queries.
fn supervisor_factory(config: &AppConfig) -> AgentFactory {
    let token = config.auth.api_token.clone();
    let downstreams = [
        (
            AgentKind::Jira,
            vec!["jira", "issue", "ticket", "sprint", "backlog"],
        ),
        (
            AgentKind::GitHub,
            vec!["github", "repo", "repository", "pull", "commit", "branch"],
        ),
        (
            AgentKind::Postman,
            vec!["postman", "collection", "api test", "environment"],
        ),
    ]
    .map(|(kind, keywords)| (kind, config.agent(kind).base_url, keywords));

    Box::new(move || {
        let mut routes = Vec::with_capacity(downstreams.len());
        for (kind, base_url, keywords) in &downstreams {
            let mut agent = RemoteAgent::new(kind.as_str(), base_url.clone())?;
            if let Some(token) = &token {
                agent = agent.with_api_token(token.clone());
            }
            routes.push(Route::new(kind.as_str(), keywords, Arc::new(agent)));
        }
        Ok(Arc::new(SupervisorAgent::new(routes)?) as Arc<dyn Agent>)
    })
}
