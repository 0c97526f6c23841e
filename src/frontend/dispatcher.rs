//! Frontend dispatcher
//!
//! Routes one user message to the active agent's gateway and records
//! both sides of the exchange in the conversation store. Errors never
//! escape: they become visible assistant turns so the transcript shows
//! what happened.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{error, info};

use charon_core::{conversation::Role, ConversationStore};

use super::client::{GatewayClient, TokenProvider};
use crate::api::query::QueryRequest;

/// Per-agent chat dispatcher.
pub struct Dispatcher {
    store: Arc<ConversationStore>,
    client: Arc<dyn GatewayClient>,
    tokens: Arc<dyn TokenProvider>,
    /// Agent id to gateway base URL
    endpoints: HashMap<String, String>,
    /// Serializes turns within one conversation
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Dispatcher {
    /// Create a dispatcher over the given gateways.
    #[must_use]
    pub fn new(
        client: Arc<dyn GatewayClient>,
        tokens: Arc<dyn TokenProvider>,
        endpoints: HashMap<String, String>,
    ) -> Self {
        Self {
            store: Arc::new(ConversationStore::new()),
            client,
            tokens,
            endpoints,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The conversation store backing this dispatcher.
    #[must_use]
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Known agent ids, sorted.
    #[must_use]
    pub fn agents(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.endpoints.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    /// Send one message to an agent and return the text appended to
    /// the transcript. Always returns text: failures are rendered as
    /// error turns, not propagated.
    pub async fn send(&self, agent_id: &str, text: &str) -> String {
        let lock = self.conversation_lock(agent_id);
        let _guard = lock.lock().await;

        self.store.append_turn(agent_id, Role::User, text).await;

        let reply_text = match self.endpoints.get(agent_id) {
            Some(base_url) => {
                let request = QueryRequest {
                    query: text.to_string(),
                    session_id: Some(self.store.session_id(agent_id).await),
                };
                let token = self.tokens.token();
                match self.client.query(base_url, token, &request).await {
                    Ok(reply) => {
                        info!(
                            agent = agent_id,
                            execution_time = reply.execution_time,
                            session = reply.session_id.as_deref().unwrap_or("-"),
                            "Reply received"
                        );
                        reply.result.display_text()
                    }
                    Err(e) => {
                        error!(agent = agent_id, error = %e, "Gateway call failed");
                        format!("Sorry, I encountered an error: {}", e)
                    }
                }
            }
            None => format!("Sorry, I encountered an error: unknown agent '{}'", agent_id),
        };

        self.store
            .append_turn(agent_id, Role::Assistant, reply_text.clone())
            .await;
        reply_text
    }

    /// Clear one agent's conversation.
    pub async fn clear(&self, agent_id: &str) {
        self.store.clear(agent_id).await;
    }

    fn conversation_lock(&self, agent_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks
            .entry(agent_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
