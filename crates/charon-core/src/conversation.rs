//! Conversation store
//!
//! Keeps one independent transcript per agent plus a pointer to the
//! currently selected agent. Switching agents preserves every
//! transcript; clearing one conversation never touches another.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human operator
    User,
    /// The agent's reply
    Assistant,
}

/// One entry in a conversation transcript.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationTurn {
    /// Who spoke
    pub role: Role,
    /// Displayed text content
    pub content: String,
    /// When the turn was recorded
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Conversation {
    session_id: Option<String>,
    turns: Vec<ConversationTurn>,
}

#[derive(Debug, Default)]
struct Inner {
    active: Option<String>,
    conversations: HashMap<String, Conversation>,
}

/// Per-agent conversation transcripts behind a single lock.
#[derive(Debug, Default)]
pub struct ConversationStore {
    inner: RwLock<Inner>,
}

impl ConversationStore {
    /// Create an empty store with no agent selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the agent subsequent turns belong to. Creates an empty
    /// conversation for a first-seen agent.
    pub async fn select_agent(&self, agent_id: &str) {
        let mut inner = self.inner.write().await;
        inner.active = Some(agent_id.to_string());
        inner.conversations.entry(agent_id.to_string()).or_default();
    }

    /// The currently selected agent, if any.
    pub async fn active_agent(&self) -> Option<String> {
        self.inner.read().await.active.clone()
    }

    /// Append a turn to one agent's transcript.
    pub async fn append_turn(&self, agent_id: &str, role: Role, content: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner
            .conversations
            .entry(agent_id.to_string())
            .or_default()
            .turns
            .push(ConversationTurn {
                role,
                content: content.into(),
                timestamp: Utc::now(),
            });
    }

    /// Snapshot of one agent's transcript, oldest first.
    pub async fn history(&self, agent_id: &str) -> Vec<ConversationTurn> {
        self.inner
            .read()
            .await
            .conversations
            .get(agent_id)
            .map(|c| c.turns.clone())
            .unwrap_or_default()
    }

    /// Erase one agent's transcript and session id. Other agents'
    /// conversations are untouched.
    pub async fn clear(&self, agent_id: &str) {
        let mut inner = self.inner.write().await;
        if let Some(conversation) = inner.conversations.get_mut(agent_id) {
            conversation.turns.clear();
            conversation.session_id = None;
        }
    }

    /// The agent's session id, minted on first use and stable until
    /// the conversation is cleared.
    pub async fn session_id(&self, agent_id: &str) -> String {
        let mut inner = self.inner.write().await;
        let conversation = inner.conversations.entry(agent_id.to_string()).or_default();
        conversation
            .session_id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transcripts_are_isolated() {
        let store = ConversationStore::new();
        store.append_turn("github", Role::User, "list repos").await;
        store.append_turn("jira", Role::User, "list issues").await;
        store
            .append_turn("github", Role::Assistant, "- repo-a\n- repo-b")
            .await;

        let github = store.history("github").await;
        let jira = store.history("jira").await;

        assert_eq!(github.len(), 2);
        assert_eq!(jira.len(), 1);
        assert!(github.iter().all(|t| !t.content.contains("issues")));
    }

    #[tokio::test]
    async fn test_switching_agents_preserves_history() {
        let store = ConversationStore::new();
        store.select_agent("github").await;
        store.append_turn("github", Role::User, "hello").await;

        store.select_agent("jira").await;
        assert_eq!(store.active_agent().await.as_deref(), Some("jira"));

        store.select_agent("github").await;
        assert_eq!(store.history("github").await.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_scopes_to_one_agent() {
        let store = ConversationStore::new();
        store.append_turn("github", Role::User, "a").await;
        store.append_turn("jira", Role::User, "b").await;

        store.clear("github").await;

        assert!(store.history("github").await.is_empty());
        assert_eq!(store.history("jira").await.len(), 1);
    }

    #[tokio::test]
    async fn test_session_id_stable_until_cleared() {
        let store = ConversationStore::new();
        let first = store.session_id("supervisor").await;
        let second = store.session_id("supervisor").await;
        assert_eq!(first, second);

        store.clear("supervisor").await;
        let third = store.session_id("supervisor").await;
        assert_ne!(first, third);
    }

    #[tokio::test]
    async fn test_no_agent_selected_initially() {
        let store = ConversationStore::new();
        assert!(store.active_agent().await.is_none());
        assert!(store.history("anything").await.is_empty());
    }
}
