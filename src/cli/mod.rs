//! CLI module for Charon
//!
//! Provides the top-level commands:
//! - `serve`: start one agent gateway server
//! - `chat`: interactive chat frontend against running gateways

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use charon_agents::AgentKind;

/// Charon Agent Gateway CLI
#[derive(Parser, Debug)]
#[command(name = "charon")]
#[command(about = "HTTP gateway layer for opaque backend agents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a gateway server for one agent kind
    Serve {
        /// Agent kind to serve (github, jira, postman, supervisor)
        #[arg(long)]
        agent: String,
        /// Port override (defaults to the kind's configured port)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Interactive chat against running gateways
    Chat,
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Serve { agent, port }) => {
            let kind: AgentKind = agent.parse().map_err(|e: String| anyhow!(e))?;
            crate::server::run(kind, port).await
        }
        Some(Commands::Chat) => crate::frontend::chat::run().await,
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
