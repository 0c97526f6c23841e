//! Gateway transport and token provisioning

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

#[cfg(test)]
use mockall::automock;

use charon_core::NormalizedResult;

use crate::api::query::QueryRequest;

/// Request timeout for gateway calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Reply from a gateway `/query` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayReply {
    /// Normalized agent response
    pub result: NormalizedResult,
    /// Wall-clock seconds the gateway spent
    pub execution_time: f64,
    /// Session id (supervisor replies only)
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Transport to a gateway's query endpoint.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GatewayClient: Send + Sync {
    /// Send a query to the gateway at `base_url`.
    async fn query(
        &self,
        base_url: &str,
        token: Option<String>,
        request: &QueryRequest,
    ) -> Result<GatewayReply>;
}

/// Production transport over reqwest.
pub struct HttpGatewayClient {
    client: reqwest::Client,
}

impl HttpGatewayClient {
    /// Build the client with the default timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl GatewayClient for HttpGatewayClient {
    async fn query(
        &self,
        base_url: &str,
        token: Option<String>,
        request: &QueryRequest,
    ) -> Result<GatewayReply> {
        let url = format!("{}/query", base_url.trim_end_matches('/'));

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = token {
            builder = builder.header("X-Api-Token", token);
        }

        let response = builder.send().await.context("Gateway unreachable")?;
        let status = response.status();

        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let detail = body
                .get("detail")
                .and_then(|v| v.as_str())
                .unwrap_or("gateway returned an error");
            bail!("{}: {}", status, detail);
        }

        response
            .json::<GatewayReply>()
            .await
            .context("Malformed gateway reply")
    }
}

/// Source of the `X-Api-Token` value attached to gateway calls.
pub trait TokenProvider: Send + Sync {
    /// The token to present, if any.
    fn token(&self) -> Option<String>;
}

/// Fixed token from configuration.
pub struct StaticTokenProvider(Option<String>);

impl StaticTokenProvider {
    /// Wrap a configured token; `None` sends no header.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self(token)
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_token_provider() {
        assert_eq!(
            StaticTokenProvider::new(Some("secret".into())).token(),
            Some("secret".to_string())
        );
        assert!(StaticTokenProvider::new(None).token().is_none());
    }

    #[test]
    fn test_gateway_reply_deserializes_tagged_result() {
        let reply: GatewayReply = serde_json::from_value(serde_json::json!({
            "result": {"kind": "text", "text": "hello"},
            "execution_time": 0.42
        }))
        .unwrap();
        assert_eq!(reply.result.display_text(), "hello");
        assert!(reply.session_id.is_none());
    }
}
