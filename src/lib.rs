//! Japanese to Korean translation gateway
//!
//! This library wraps a locally hosted LLM (served over the Ollama HTTP API)
//! behind a single translation operation: build a prompt, call the backend,
//! and clean the generated text down to Korean.

#![forbid(unsafe_code)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use core::{
    backend::{OllamaBackend, TextGenerator},
    cleanup::clean_translation,
    client::Translator,
    config::GatewayConfig,
    errors::TranslationError,
    models::{TranslationRequest, TranslationResponse, TranslationResult},
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
