//! Error types for charon-core
//!
//! One taxonomy for the whole request path: validation errors are
//! rejected before dispatch, backend failures are retried only where a
//! retry policy is present, and no error ever takes the hosting
//! process down with it.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Bad input — rejected before any dispatch, never retried
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Missing or invalid API token
    #[error("invalid or missing API token")]
    Unauthorized,

    /// Unknown predefined task key
    #[error("Task '{key}' not found. Available tasks: [{}]", valid.join(", "))]
    UnknownTask {
        /// The rejected key
        key: String,
        /// Valid keys, surfaced to the caller
        valid: Vec<String>,
    },

    /// Per-attempt deadline exceeded — distinct from a backend-reported
    /// failure, retried where a retry policy applies
    #[error("backend timed out after {elapsed_secs:.2}s")]
    BackendTimeout {
        /// Seconds elapsed before the deadline fired
        elapsed_secs: f64,
    },

    /// The agent backend raised or returned a failure
    #[error("agent error: {0}")]
    Agent(#[from] charon_agents::Error),

    /// Retry budget exhausted; carries the last failure
    #[error("agent failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Total attempts made
        attempts: u32,
        /// The final attempt's failure
        #[source]
        last_error: Box<Error>,
    },

    /// Internal error (worker pool, serialization, etc.)
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether a retry policy may re-attempt after this failure.
    /// Validation and auth failures are never retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::BackendTimeout { .. } | Error::Agent(_))
    }

    /// Whether the failure chain ends in a timeout (surfaced as a
    /// gateway-timeout rather than a generic server error).
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::BackendTimeout { .. } => true,
            Error::RetriesExhausted { last_error, .. } => last_error.is_timeout(),
            _ => false,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_task_lists_valid_keys() {
        let err = Error::UnknownTask {
            key: "unknown-key".to_string(),
            valid: vec!["list-projects".to_string(), "recent-commits".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown-key"));
        assert!(msg.contains("list-projects, recent-commits"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(Error::BackendTimeout { elapsed_secs: 1.0 }.is_transient());
        assert!(Error::Agent(charon_agents::Error::Backend("boom".into())).is_transient());
        assert!(!Error::InvalidQuery("empty".into()).is_transient());
        assert!(!Error::Unauthorized.is_transient());
    }

    #[test]
    fn test_timeout_chain_detection() {
        let exhausted = Error::RetriesExhausted {
            attempts: 3,
            last_error: Box::new(Error::BackendTimeout { elapsed_secs: 2.5 }),
        };
        assert!(exhausted.is_timeout());

        let exhausted = Error::RetriesExhausted {
            attempts: 3,
            last_error: Box::new(Error::Agent(charon_agents::Error::Backend("x".into()))),
        };
        assert!(!exhausted.is_timeout());
    }
}
