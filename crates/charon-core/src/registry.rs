//! Lazy agent registry
//!
//! Agents are expensive to construct (auth handshakes, client setup),
//! so each one is built at most once, on first use. Construction
//! failures are returned to the caller and never cached: the next
//! request triggers a fresh attempt.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use charon_agents::Agent;

use crate::error::{Error, Result};

/// Factory closure that builds an agent on demand.
pub type AgentFactory = Box<dyn Fn() -> charon_agents::Result<Arc<dyn Agent>> + Send + Sync>;

struct Slot {
    factory: AgentFactory,
    handle: OnceCell<Arc<dyn Agent>>,
}

/// Registry of lazily constructed agent singletons.
///
/// Concurrent first calls for the same agent are coalesced: one
/// caller runs the factory, the rest wait and share the result.
#[derive(Default)]
pub struct AgentRegistry {
    slots: HashMap<String, Slot>,
}

impl AgentRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under an agent id. Replaces any previous
    /// factory for the same id, dropping its cached instance.
    #[must_use]
    pub fn register(mut self, id: impl Into<String>, factory: AgentFactory) -> Self {
        self.slots.insert(
            id.into(),
            Slot {
                factory,
                handle: OnceCell::new(),
            },
        );
        self
    }

    /// Resolve an agent, constructing it on first use.
    pub async fn resolve(&self, id: &str) -> Result<Arc<dyn Agent>> {
        let slot = self
            .slots
            .get(id)
            .ok_or_else(|| Error::Internal(format!("no agent registered under '{}'", id)))?;

        let agent = slot
            .handle
            .get_or_try_init(|| async {
                info!(agent = id, "Constructing agent");
                (slot.factory)()
            })
            .await?;

        Ok(agent.clone())
    }

    /// Whether the agent has already been constructed.
    #[must_use]
    pub fn is_constructed(&self, id: &str) -> bool {
        self.slots
            .get(id)
            .map(|slot| slot.handle.initialized())
            .unwrap_or(false)
    }

    /// All registered agent ids.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.slots.keys().map(String::as_str).collect()
    }
}
