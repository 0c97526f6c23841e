//! Interactive chat REPL
//!
//! Commands:
//! - `/use <agent>`  switch the active agent
//! - `/agents`       list known agents
//! - `/history`      print the active conversation
//! - `/clear`        clear the active conversation
//! - `/quit`         exit

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use charon_agents::AgentKind;
use charon_core::conversation::Role;

use super::client::{HttpGatewayClient, StaticTokenProvider};
use super::dispatcher::Dispatcher;
use crate::server::load_config;

/// Run the chat REPL against the configured gateways.
pub async fn run() -> Result<()> {
    let config = load_config().context("Failed to load configuration")?;

    let endpoints: HashMap<String, String> = AgentKind::ALL
        .iter()
        .map(|kind| (kind.as_str().to_string(), config.agent(*kind).base_url))
        .collect();

    let dispatcher = Dispatcher::new(
        Arc::new(HttpGatewayClient::new()?),
        Arc::new(StaticTokenProvider::new(config.auth.api_token.clone())),
        endpoints,
    );

    println!("Charon chat. /use <agent> to pick an agent, /quit to exit.");
    println!("Agents: {}", dispatcher.agents().join(", "));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').map_or((line, ""), |(c, r)| (c, r.trim())) {
            ("/quit", _) | ("/exit", _) => break,
            ("/agents", _) => {
                println!("Agents: {}", dispatcher.agents().join(", "));
            }
            ("/use", agent) => {
                if dispatcher.agents().iter().any(|a| a == agent) {
                    dispatcher.store().select_agent(agent).await;
                    println!("Now talking to {}", agent);
                } else {
                    println!("Unknown agent '{}'", agent);
                }
            }
            ("/history", _) => match dispatcher.store().active_agent().await {
                Some(agent) => {
                    for turn in dispatcher.store().history(&agent).await {
                        let who = match turn.role {
                            Role::User => "you",
                            Role::Assistant => agent.as_str(),
                        };
                        println!("[{}] {}", who, turn.content);
                    }
                }
                None => println!("No agent selected. /use <agent> first."),
            },
            ("/clear", _) => match dispatcher.store().active_agent().await {
                Some(agent) => {
                    dispatcher.clear(&agent).await;
                    println!("Conversation with {} cleared", agent);
                }
                None => println!("No agent selected. /use <agent> first."),
            },
            _ => match dispatcher.store().active_agent().await {
                Some(agent) => {
                    let reply = dispatcher.send(&agent, line).await;
                    println!("{}", reply);
                }
                None => println!("No agent selected. /use <agent> first."),
            },
        }
    }

    Ok(())
}
