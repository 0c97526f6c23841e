//! Scripted agent - deterministic stub backend
//!
//! Used when a gateway is started without a real backend, and by tests
//! that need controllable latency and failure behavior. Replies are
//! matched by substring against the query; unmatched queries get an
//! echo response.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use serde_json::json;

use crate::agent::{Agent, RawResponse};
use crate::error::{Error, Result};

/// A scripted agent backend with canned replies.
pub struct ScriptedAgent {
    name: String,
    replies: Vec<(String, RawResponse)>,
    latency: Option<Duration>,
    fail_remaining: AtomicU32,
}

impl ScriptedAgent {
    /// Create a scripted agent with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Vec::new(),
            latency: None,
            fail_remaining: AtomicU32::new(0),
        }
    }

    /// Add a canned reply returned when the query contains `pattern`.
    /// First matching pattern wins.
    #[must_use]
    pub fn with_reply(mut self, pattern: impl Into<String>, reply: RawResponse) -> Self {
        self.replies.push((pattern.into(), reply));
        self
    }

    /// Simulate a slow backend: every call blocks for `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail the next `n` calls with a backend error, then recover.
    #[must_use]
    pub fn failing_times(self, n: u32) -> Self {
        self.fail_remaining.store(n, Ordering::SeqCst);
        self
    }

    fn respond(&self, input: &str, session_id: Option<&str>) -> Result<RawResponse> {
        if let Some(latency) = self.latency {
            // Blocking on purpose: the bridge runs this off the event loop.
            std::thread::sleep(latency);
        }

        let remaining = self.fail_remaining.load(Ordering::SeqCst);
        if remaining > 0
            && self
                .fail_remaining
                .compare_exchange(remaining, remaining - 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
        {
            return Err(Error::Backend(format!(
                "{} backend unavailable (scripted failure)",
                self.name
            )));
        }

        for (pattern, reply) in &self.replies {
            if input.contains(pattern.as_str()) {
                return Ok(reply.clone());
            }
        }

        Ok(json!({
            "content": format!("[{}] {}", self.name, input),
            "session_id": session_id,
        }))
    }
}

impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn chat(&self, query: &str, session_id: Option<&str>) -> Result<RawResponse> {
        self.respond(query, session_id)
    }

    fn execute_predefined_task(&self, key: &str, session_id: Option<&str>) -> Result<RawResponse> {
        self.respond(key, session_id)
    }
}
