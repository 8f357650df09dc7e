//! Ollama-style `/api/generate` backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use familia_core::chat::{ChatBackend, ChatRequest, NO_RESPONSE};
use familia_core::settings::DEFAULT_CHAT_ENDPOINT;

use crate::error::ChatError;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// A local LLM reached over HTTP. `endpoint` is the full generate URL.
pub struct OllamaChat {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaChat {
    pub fn new(endpoint: &str) -> Result<Self, ChatError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(endpoint: &str, timeout_secs: u64) -> Result<Self, ChatError> {
        let endpoint = if endpoint.trim().is_empty() {
            DEFAULT_CHAT_ENDPOINT
        } else {
            endpoint.trim()
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ChatError::Client(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: Option<String>,
}

#[async_trait]
impl ChatBackend for OllamaChat {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip(self, request), fields(model = %request.model, endpoint = %self.endpoint))]
    async fn generate(&self, request: &ChatRequest) -> anyhow::Result<String> {
        let start = Instant::now();

        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ChatError::NetworkError(format!(
                        "chat endpoint not reachable at {}. Is it running? Start with: ollama serve",
                        self.endpoint
                    ))
                } else {
                    ChatError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ChatError::ApiError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let reply: GenerateReply = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        debug!(
            latency_ms = start.elapsed().as_millis() as u64,
            "chat reply received"
        );

        Ok(reply
            .response
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}
