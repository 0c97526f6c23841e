//! Agent - the opaque conversational capability
//!
//! An agent answers a natural-language query, possibly using tools,
//! possibly stateful across a session. Calls may block for seconds to
//! minutes and may retry internally; callers treat them as opaque,
//! possibly-slow, possibly-failing functions and dispatch them through
//! the blocking bridge.

use crate::error::Result;

/// Untyped response produced by an agent capability.
///
/// Backends return anything from plain strings to deeply nested
/// `content`/`message`/`text` envelopes; the gateway normalizes the
/// shape at its boundary.
pub type RawResponse = serde_json::Value;

/// A conversational agent backend.
///
/// Methods are deliberately synchronous: invocations may block and are
/// expected to run on a worker pool, never on the request-handling
/// event loop.
pub trait Agent: Send + Sync {
    /// Backend name for logs and liveness listings.
    fn name(&self) -> &str;

    /// Answer a free-form query. `session_id` is an opaque correlation
    /// token; `None` means the backend's own default session.
    fn chat(&self, query: &str, session_id: Option<&str>) -> Result<RawResponse>;

    /// Execute a named, pre-specified query shortcut.
    ///
    /// The gateway validates `key` against the fixed task table before
    /// calling; backends without task support fall back to treating the
    /// key as a query.
    fn execute_predefined_task(&self, key: &str, session_id: Option<&str>) -> Result<RawResponse> {
        self.chat(key, session_id)
    }
}
