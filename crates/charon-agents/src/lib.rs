//! Charon Agents - Agent Capability Abstraction
//!
//! This crate provides the opaque agent capability surface for Charon:
//! - Agent: the `chat`/`execute_predefined_task` trait every backend implements
//! - Kinds: the fixed set of agent kinds and their predefined-task tables
//! - Scripted: a deterministic stub backend for demos and tests
//! - Remote: an HTTP client backend fronting another gateway
//! - Supervisor: a routing backend that forwards to downstream gateways

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod error;
pub mod kinds;
pub mod remote;
pub mod scripted;
pub mod supervisor;

pub use agent::{Agent, RawResponse};
pub use error::{Error, Result};
pub use kinds::{predefined_tasks, AgentKind, PredefinedTask};
pub use remote::RemoteAgent;
pub use scripted::ScriptedAgent;
pub use supervisor::{Route, SupervisorAgent};
