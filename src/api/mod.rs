//! Web API module for Charon
//!
//! Provides the gateway REST endpoints:
//! - Health probe
//! - Query dispatch to the fronted agent
//! - Predefined task listing and execution
//! - Agent liveness listing
//! - OpenAPI docs

pub mod agents;
pub mod docs;
pub mod health;
pub mod query;
pub mod tasks;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::{Extension, Router};
use serde_json::json;

use charon_agents::AgentKind;
use charon_core::{AgentRegistry, BlockingBridge, RetryPolicy};

pub use agents::agents_routes;
pub use docs::docs_routes;
pub use health::health_routes;
pub use query::query_routes;
pub use tasks::tasks_routes;

/// Shared state for one gateway process.
pub struct GatewayState {
    /// The agent kind this gateway fronts
    pub kind: AgentKind,
    /// Lazily constructed agent handles
    pub registry: AgentRegistry,
    /// Bounded executor for blocking agent calls
    pub bridge: BlockingBridge,
    /// Retry policy; set only on the supervisor path
    pub retry: Option<RetryPolicy>,
}

/// Create the gateway router for a kind, with only the route groups
/// that kind exposes.
pub fn gateway_router(state: Arc<GatewayState>) -> Router {
    let kind = state.kind;
    let mut router = Router::new().merge(health_routes()).merge(query_routes());
    if kind.has_task_routes() {
        router = router.merge(tasks_routes());
    }
    if kind.has_agents_route() {
        router = router.merge(agents_routes());
    }
    router.merge(docs_routes()).layer(Extension(state))
}

/// Error returned by gateway handlers, rendered as the original
/// `{"detail": ...}` JSON body.
pub struct ApiError(pub charon_core::Error);

impl From<charon_core::Error> for ApiError {
    fn from(err: charon_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use charon_core::Error;

        let status = match &self.0 {
            Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::UnknownTask { .. } => StatusCode::NOT_FOUND,
            Error::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::RetriesExhausted { .. } if self.0.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Error::RetriesExhausted { .. } | Error::Agent(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({"detail": self.0.to_string()}))).into_response()
    }
}

/// Round a duration in seconds to two decimals, as the replies echo it.
#[must_use]
pub fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}


#[cfg(test)]
mod error_tests {
    use super::*;
    use charon_core::Error;

    fn status_of(err: Error) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(Error::InvalidQuery("empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(Error::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(Error::UnknownTask {
                key: "x".into(),
                valid: vec![]
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(Error::BackendTimeout { elapsed_secs: 1.0 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_of(Error::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_exhaustion_status_follows_last_error() {
        let timed_out = Error::RetriesExhausted {
            attempts: 3,
            last_error: Box::new(Error::BackendTimeout { elapsed_secs: 120.0 }),
        };
        assert_eq!(status_of(timed_out), StatusCode::GATEWAY_TIMEOUT);

        let backend = Error::RetriesExhausted {
            attempts: 3,
            last_error: Box::new(Error::Agent(charon_agents::Error::Backend("down".into()))),
        };
        assert_eq!(status_of(backend), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_round_secs() {
        assert_eq!(round_secs(1.23456), 1.23);
        assert_eq!(round_secs(0.005), 0.01);
        assert_eq!(round_secs(0.0), 0.0);
    }
}
