//! Translation gateway: prompt, backend call, cleanup

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::core::backend::{OllamaBackend, TextGenerator};
use crate::core::cleanup::clean_translation;
use crate::core::config::GatewayConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{BackendStatus, GenerateRequest, TranslationResult};
use crate::core::prompt::{build_prompt, SYSTEM_PROMPT};

/// Japanese to Korean translator over an injectable text-generation backend
#[derive(Clone)]
pub struct Translator {
    backend: Arc<dyn TextGenerator>,
    config: Arc<GatewayConfig>,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Create a translator over any backend
    pub fn new(config: GatewayConfig, backend: Arc<dyn TextGenerator>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            backend,
            config: Arc::new(config),
        })
    }

    /// Create a translator talking to Ollama
    pub fn with_ollama(config: GatewayConfig) -> Result<Self> {
        let backend = Arc::new(OllamaBackend::new(&config)?);
        Self::new(config, backend)
    }

    /// Create from environment
    pub fn from_env() -> anyhow::Result<Self> {
        let config = GatewayConfig::from_env()?;
        Ok(Self::with_ollama(config)?)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Translate with the configured model
    pub async fn translate(&self, source_text: &str) -> Result<TranslationResult> {
        self.translate_with_model(source_text, None).await
    }

    /// Translate, optionally overriding the model for this call
    pub async fn translate_with_model(
        &self,
        source_text: &str,
        model: Option<&str>,
    ) -> Result<TranslationResult> {
        if source_text.trim().is_empty() {
            return Err(TranslationError::InvalidInput {
                message: "japanese_text must not be empty".to_string(),
            });
        }

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.model.as_str());

        let request = GenerateRequest {
            model: model.to_string(),
            prompt: build_prompt(source_text),
            system: SYSTEM_PROMPT.to_string(),
            stream: false,
            options: self.config.options,
        };

        info!("Translation request: {} chars, model {}", source_text.chars().count(), model);
        debug!("Prompt: {}", request.prompt);

        let raw_output = self.generate_with_retry(&request).await?;
        debug!("Raw backend output: {}", raw_output);

        let translation = clean_translation(&raw_output).inspect_err(|_| {
            warn!("Backend output had no usable Korean text: {:?}", raw_output);
        })?;
        debug!("Cleaned translation: {}", translation);

        Ok(TranslationResult {
            translation,
            raw_output,
            model_used: request.model,
        })
    }

    /// One backend call, plus a single retry on a transient network failure.
    /// `timeout_ms` bounds both attempts together.
    async fn generate_with_retry(&self, request: &GenerateRequest) -> Result<String> {
        let attempts = async {
            match self.backend.generate(request).await {
                Err(e) if e.is_transient() && self.config.retry_on_network_error => {
                    warn!("Backend call failed: {}, retrying once", e);
                    sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    self.backend.generate(request).await
                }
                result => result,
            }
        };

        match timeout(self.config.timeout(), attempts).await {
            Ok(result) => result,
            Err(_) => Err(TranslationError::Timeout {
                timeout_ms: self.config.timeout_ms,
            }),
        }
    }

    /// Probe the backend
    pub async fn health(&self) -> BackendStatus {
        self.backend.probe().await
    }
}
