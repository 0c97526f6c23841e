//! Server module for Charon
//!
//! # Module Structure
//!
//! - `config`: Configuration structures for the gateways and frontend
//! - `loader`: Configuration loading from files and environment
//! - `init`: Gateway initialization and run loop

pub mod config;
mod init;
mod loader;

pub use init::run;
pub use loader::load_config;
