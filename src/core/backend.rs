//! Text-generation backends

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::config::GatewayConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{BackendStatus, GenerateRequest, GenerateResponse};

/// Deadline for health probes, independent of the generation timeout
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A service that turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Run one completion and return the generated text as-is
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;

    /// Check whether the backend answers at all
    async fn probe(&self) -> BackendStatus;
}

/// Ollama `/api/tags` reply
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Backend speaking the Ollama HTTP API
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl OllamaBackend {
    /// Create a backend client from gateway configuration
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| TranslationError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TextGenerator for OllamaBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(request)
            .send()
            .await
            .map_err(|e| TranslationError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::bad_reply(format!(
                "backend returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let reply: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TranslationError::Timeout {
                    timeout_ms: self.timeout_ms,
                }
            } else {
                TranslationError::bad_reply(format!("undecodable backend reply: {}", e))
            }
        })?;

        debug!(
            "Backend reply: model={:?} done={:?}",
            reply.model, reply.done
        );

        match reply.response {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(TranslationError::EmptyResponse),
        }
    }

    async fn probe(&self) -> BackendStatus {
        let result = self
            .client
            .get(self.url("/api/tags"))
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;

        let response = match result {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("Backend probe returned {}", response.status());
                return BackendStatus::unreachable();
            }
            Err(e) => {
                warn!("Backend probe failed: {}", e);
                return BackendStatus::unreachable();
            }
        };

        // A reachable backend with an unexpected body still counts as up.
        let models = match response.json::<TagsResponse>().await {
            Ok(tags) => tags.models.into_iter().map(|m| m.name).collect(),
            Err(e) => {
                debug!("Could not read model list: {}", e);
                Vec::new()
            }
        };

        BackendStatus {
            reachable: true,
            models,
        }
    }
}
