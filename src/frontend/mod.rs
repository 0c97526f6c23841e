//! Chat frontend
//!
//! Talks to running gateways over HTTP and keeps one conversation per
//! agent. The transport sits behind a trait so the dispatcher is
//! testable without live servers.

pub mod chat;
pub mod client;
pub mod dispatcher;
