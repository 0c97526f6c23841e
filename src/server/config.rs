//! Server configuration types

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use charon_agents::AgentKind;
use charon_core::RetryPolicy;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    /// Per-kind gateway settings, keyed by kind name
    #[serde(default)]
    pub agents: HashMap<String, AgentSettings>,
}

impl AppConfig {
    /// Settings for one kind, falling back to the kind's defaults
    /// when the config has no entry.
    #[must_use]
    pub fn agent(&self, kind: AgentKind) -> AgentSettings {
        let mut settings = self
            .agents
            .get(kind.as_str())
            .cloned()
            .unwrap_or_default();
        if settings.port == 0 {
            settings.port = kind.default_port();
        }
        if settings.workers == 0 {
            settings.workers = kind.default_workers();
        }
        if settings.base_url.is_empty() {
            settings.base_url = format!("http://{}:{}", self.server.host, settings.port);
        }
        settings
    }
}

/// Listen settings shared by every gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
        }
    }
}

/// Gateway authentication
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Expected `X-Api-Token` value. Unset disables the check.
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Supervisor retry settings (TOML view of [`RetryPolicy`])
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub per_attempt_timeout_secs: u64,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_attempt_timeout_secs: 120,
            initial_backoff_ms: 500,
            max_backoff_ms: 10_000,
        }
    }
}

impl RetrySettings {
    /// Build the runtime policy from the TOML view.
    #[must_use]
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(self.max_attempts)
            .with_per_attempt_timeout(Duration::from_secs(self.per_attempt_timeout_secs))
            .with_initial_backoff(Duration::from_millis(self.initial_backoff_ms))
            .with_max_backoff(Duration::from_millis(self.max_backoff_ms))
    }
}

/// Per-kind gateway settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Listen port; 0 means the kind's default
    #[serde(default)]
    pub port: u16,
    /// Blocking-bridge worker slots; 0 means the kind's default
    #[serde(default)]
    pub workers: usize,
    /// Base URL the frontend dispatches to; empty means host:port
    #[serde(default)]
    pub base_url: String,
    /// Upstream backend the gateway forwards to; empty runs the
    /// built-in echo stub
    #[serde(default)]
    pub backend_url: String,
}
