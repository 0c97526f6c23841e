//! Charon Core - Gateway Orchestration Engine
//!
//! This crate provides the reusable orchestration layer behind every
//! Charon gateway:
//! - Normalize: turn heterogeneous agent responses into one tagged result
//! - Bridge: run blocking agent invocations off the event loop
//! - Retry: bounded retry with per-attempt timeout for the supervisor path
//! - Registry: lazily-constructed, process-lifetime agent handles
//! - Conversation: per-agent transcripts and session identity

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bridge;
pub mod conversation;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod retry;

pub use bridge::BlockingBridge;
pub use conversation::{ConversationStore, ConversationTurn, Role};
pub use error::{Error, Result};
pub use normalize::{normalize, NormalizedResult};
pub use registry::{AgentFactory, AgentRegistry};
pub use retry::{execute_with_retry, RetryPolicy};
