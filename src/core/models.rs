//! Core data models for translation

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Translation request as accepted by `POST /translate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslationRequest {
    /// Japanese source text
    pub japanese_text: String,
    /// Overrides the configured model for this request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl TranslationRequest {
    pub fn new(japanese_text: impl Into<String>) -> Self {
        Self {
            japanese_text: japanese_text.into(),
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Translation response returned by `POST /translate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslationResponse {
    pub translated_text: String,
    pub model_used: String,
    /// Uncleaned backend text, only present when diagnostics are enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_backend_output: Option<String>,
}

/// Outcome of a single gateway translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub translation: String,
    pub raw_output: String,
    pub model_used: String,
}

/// Sampling options forwarded to the backend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_ctx: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            num_ctx: 4096,
        }
    }
}

/// One text-generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub system: String,
    pub stream: bool,
    pub options: GenerationOptions,
}

/// Reply of the backend's generate endpoint. Only `response` matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

/// Backend reachability as reported by a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendStatus {
    pub reachable: bool,
    /// Installed model names, when the backend lists them
    pub models: Vec<String>,
}

impl BackendStatus {
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            models: Vec::new(),
        }
    }

    /// `None` when the backend is down, so availability is unknown
    pub fn has_model(&self, model: &str) -> Option<bool> {
        if !self.reachable {
            return None;
        }
        Some(self.models.iter().any(|m| model_matches(m, model)))
    }
}

/// Ollama lists untagged pulls as `name:latest`.
fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted
        || (!wanted.contains(':') && installed == format!("{}:latest", wanted))
}
