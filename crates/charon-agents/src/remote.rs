//! Remote agent - HTTP client backend fronting another gateway
//!
//! Wraps a downstream gateway's `/query` endpoint behind the `Agent`
//! trait. Calls use a blocking HTTP client because the trait contract
//! is blocking; the caller's bridge keeps the event loop free.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::agent::{Agent, RawResponse};
use crate::error::{Error, Result};

/// Default request timeout for downstream gateway calls.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// An agent backed by another gateway over HTTP.
pub struct RemoteAgent {
    name: String,
    base_url: String,
    api_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl RemoteAgent {
    /// Create a remote agent for the gateway at `base_url`.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;
        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            client,
        })
    }

    /// Attach an `X-Api-Token` header to every downstream call.
    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Base URL of the downstream gateway.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post_query(&self, query: &str, session_id: Option<&str>) -> Result<RawResponse> {
        let url = format!("{}/query", self.base_url);
        debug!(agent = %self.name, %url, "Forwarding query to downstream gateway");

        let mut request = self
            .client
            .post(&url)
            .json(&json!({ "query": query, "session_id": session_id }));
        if let Some(token) = &self.api_token {
            request = request.header("X-Api-Token", token);
        }

        let response = request.send()?;
        let status = response.status();
        let body: RawResponse = response.json()?;

        if !status.is_success() {
            let detail = body
                .get("detail")
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .unwrap_or("downstream gateway returned an error");
            return Err(Error::Backend(format!(
                "{} ({}): {}",
                self.name, status, detail
            )));
        }

        // The downstream body carries its own `result` envelope; hand the
        // whole thing to the normalizer rather than unwrapping here.
        Ok(body)
    }
}

impl Agent for RemoteAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn chat(&self, query: &str, session_id: Option<&str>) -> Result<RawResponse> {
        self.post_query(query, session_id)
    }
}
