//! Error types for charon-agents

use thiserror::Error;

/// Agent backend error type
#[derive(Debug, Error)]
pub enum Error {
    /// Backend construction failed (handle must not be cached)
    #[error("agent construction failed: {0}")]
    Construction(String),

    /// The backend reported a failure while answering
    #[error("backend error: {0}")]
    Backend(String),

    /// The backend does not expose the requested capability
    #[error("capability not supported: {0}")]
    Unsupported(String),

    /// Transport failure reaching a remote gateway
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
