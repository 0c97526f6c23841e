//! Agent kinds and their fixed predefined-task tables

use serde::{Deserialize, Serialize};

/// The fixed set of agent kinds a gateway can front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// GitHub repository agent
    GitHub,
    /// Jira issue-tracking agent
    Jira,
    /// Postman API-testing agent
    Postman,
    /// Supervisor agent routing across the others
    Supervisor,
}

impl AgentKind {
    /// All known kinds.
    pub const ALL: [AgentKind; 4] = [
        AgentKind::GitHub,
        AgentKind::Jira,
        AgentKind::Postman,
        AgentKind::Supervisor,
    ];

    /// Get the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Jira => "jira",
            Self::Postman => "postman",
            Self::Supervisor => "supervisor",
        }
    }

    /// Default listen port for this kind's gateway.
    #[must_use]
    pub fn default_port(&self) -> u16 {
        match self {
            Self::GitHub => 8005,
            Self::Jira => 8002,
            Self::Postman => 8003,
            Self::Supervisor => 8004,
        }
    }

    /// Whether the gateway for this kind exposes `/tasks` routes.
    #[must_use]
    pub fn has_task_routes(&self) -> bool {
        matches!(self, Self::GitHub | Self::Postman)
    }

    /// Whether the gateway for this kind exposes the `/agents`
    /// liveness listing instead of a task table. The supervisor keeps
    /// its surface to `/query` and `/health` only.
    #[must_use]
    pub fn has_agents_route(&self) -> bool {
        matches!(self, Self::Jira)
    }

    /// Default worker-pool size for this kind's blocking bridge.
    #[must_use]
    pub fn default_workers(&self) -> usize {
        match self {
            Self::Supervisor => 4,
            _ => 10,
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::GitHub),
            "jira" => Ok(Self::Jira),
            "postman" => Ok(Self::Postman),
            "supervisor" => Ok(Self::Supervisor),
            other => Err(format!(
                "unknown agent kind '{}'. Valid: github, jira, postman, supervisor",
                other
            )),
        }
    }
}

/// A named, pre-specified query shortcut exposed by a gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredefinedTask {
    /// Task key used in `/tasks/{key}`
    pub key: String,
    /// Human-readable description (also the prompt handed to the agent)
    pub description: String,
}

impl PredefinedTask {
    fn new(key: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            description: description.to_string(),
        }
    }
}

/// The fixed predefined-task table for a kind. Kinds without task
/// routes have an empty table.
#[must_use]
pub fn predefined_tasks(kind: AgentKind) -> Vec<PredefinedTask> {
    match kind {
        AgentKind::GitHub => vec![
            PredefinedTask::new(
                "list-repositories",
                "List all repositories the agent can access, with visibility and default branch",
            ),
            PredefinedTask::new(
                "list-open-pull-requests",
                "List open pull requests across accessible repositories, newest first",
            ),
            PredefinedTask::new(
                "recent-commits",
                "Summarize commits pushed to the default branch in the last 7 days",
            ),
            PredefinedTask::new(
                "stale-branches",
                "Find branches with no commits in the last 90 days",
            ),
        ],
        AgentKind::Postman => vec![
            PredefinedTask::new(
                "list-collections",
                "List all Postman collections in the workspace with request counts",
            ),
            PredefinedTask::new(
                "run-smoke-collection",
                "Run the smoke-test collection and report pass/fail per request",
            ),
            PredefinedTask::new(
                "list-environments",
                "List Postman environments and their variable names (values redacted)",
            ),
        ],
        AgentKind::Jira | AgentKind::Supervisor => Vec::new(),
    }
}
