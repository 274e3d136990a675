use async_trait::async_trait;
use promptcell_core::{Error, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ChatTransport;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/chat";

/// HTTP chat transport: one POST per prompt against a fixed endpoint.
pub struct HttpChatTransport {
    client: Client,
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(endpoint: &str) -> Self {
        debug!(endpoint = %endpoint, "creating HTTP chat transport");
        Self {
            client: Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    /// Endpoint from host-supplied options, default when absent.
    pub fn from_options(endpoint: Option<&str>) -> Self {
        Self::new(endpoint.unwrap_or(DEFAULT_ENDPOINT))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Reachability check for diagnostics. Any HTTP response counts as
    /// reachable. Never consulted on the execute path.
    pub async fn probe(&self) -> Result<u16> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("probe failed: {}", e)))?;
        Ok(response.status().as_u16())
    }
}

#[derive(Debug, Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct PromptReply {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "sending prompt");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&PromptRequest { prompt })
            .send()
            .await
            .map_err(|e| Error::Transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            // Best-effort body text; fall back to the status line.
            let body = response.text().await.unwrap_or_default();
            let body = if body.is_empty() {
                status.canonical_reason().unwrap_or("").to_string()
            } else {
                body
            };
            warn!(status = %status, body = %body, "chat endpoint returned error status");
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: PromptReply = response
            .json()
            .await
            .map_err(|e| Error::Transport(format!("invalid response body: {}", e)))?;

        if let Some(error) = parsed.error {
            warn!(error = %error, "chat endpoint reported a backend failure");
            return Err(Error::Remote {
                error,
                detail: parsed.detail,
            });
        }

        let reply = parsed.reply.unwrap_or_default();
        debug!(reply_len = reply.len(), "prompt exchange complete");
        Ok(reply)
    }
}
