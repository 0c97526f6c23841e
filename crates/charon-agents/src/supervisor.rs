//! Supervisor agent - routes queries to downstream gateways
//!
//! The supervisor fronts the other agents: it picks a downstream route
//! by keyword match and forwards the query there. The routing here is
//! deliberately simple; the interesting reasoning lives behind the
//! downstream agents and is opaque to this crate.

use std::sync::Arc;

use tracing::info;

use crate::agent::{Agent, RawResponse};
use crate::error::{Error, Result};

/// A downstream route: keywords that select it plus the backend.
pub struct Route {
    /// Route name for logs
    pub name: String,
    /// Lowercase keywords that select this route
    pub keywords: Vec<String>,
    /// Backend handling matched queries
    pub agent: Arc<dyn Agent>,
}

impl Route {
    /// Create a route selecting on the given keywords.
    pub fn new(name: impl Into<String>, keywords: &[&str], agent: Arc<dyn Agent>) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            agent,
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|k| query.contains(k.as_str()))
    }
}

/// Supervisor agent dispatching to the first matching route.
///
/// Queries matching no route go to the default route (the first one
/// registered).
pub struct SupervisorAgent {
    routes: Vec<Route>,
}

impl std::fmt::Debug for SupervisorAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `Arc<dyn Agent>` is not Debug, so show route names only.
        f.debug_struct("SupervisorAgent")
            .field(
                "routes",
                &self.routes.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl SupervisorAgent {
    /// Create a supervisor with the given routes. At least one route is
    /// required; the first is the default.
    pub fn new(routes: Vec<Route>) -> Result<Self> {
        if routes.is_empty() {
            return Err(Error::Construction(
                "supervisor requires at least one route".to_string(),
            ));
        }
        Ok(Self { routes })
    }

    fn select(&self, query: &str) -> &Route {
        let lowered = query.to_lowercase();
        self.routes
            .iter()
            .find(|r| r.matches(&lowered))
            .unwrap_or(&self.routes[0])
    }
}

impl Agent for SupervisorAgent {
    fn name(&self) -> &str {
        "supervisor"
    }

    fn chat(&self, query: &str, session_id: Option<&str>) -> Result<RawResponse> {
        let route = self.select(query);
        info!(route = %route.name, "Supervisor selected route");
        route.agent.chat(query, session_id)
    }

    /// Task keys are meaningless across routes, so the default
    /// treat-as-query fallback would misroute them.
    fn execute_predefined_task(&self, key: &str, _session_id: Option<&str>) -> Result<RawResponse> {
        Err(Error::Unsupported(format!(
            "supervisor exposes no predefined task '{}'",
            key
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::ScriptedAgent;
    use serde_json::json;

    fn scripted(name: &str) -> Arc<dyn Agent> {
        Arc::new(ScriptedAgent::new(name).with_reply("", json!({"content": name.to_string()})))
    }

    #[test]
    fn test_keyword_routing() {
        let supervisor = SupervisorAgent::new(vec![
            Route::new("jira", &["jira", "ticket", "issue"], scripted("jira")),
            Route::new("postman", &["postman", "collection"], scripted("postman")),
        ])
        .unwrap();

        let reply = supervisor.chat("run the Postman collection", None).unwrap();
        assert_eq!(reply["content"], "postman");

        let reply = supervisor.chat("open a JIRA ticket", None).unwrap();
        assert_eq!(reply["content"], "jira");
    }

    #[test]
    fn test_unmatched_query_uses_default_route() {
        let supervisor = SupervisorAgent::new(vec![
            Route::new("jira", &["jira"], scripted("jira")),
            Route::new("postman", &["postman"], scripted("postman")),
        ])
        .unwrap();

        let reply = supervisor.chat("what is the weather", None).unwrap();
        assert_eq!(reply["content"], "jira");
    }

    #[test]
    fn test_predefined_tasks_are_unsupported() {
        let supervisor =
            SupervisorAgent::new(vec![Route::new("jira", &["jira"], scripted("jira"))]).unwrap();
        let err = supervisor.execute_predefined_task("list-repositories", None).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
    }

    #[test]
    fn test_no_routes_is_construction_error() {
        let err = SupervisorAgent::new(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Construction(_)));
    }
}
