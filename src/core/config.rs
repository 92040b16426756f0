//! Configuration management

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::core::errors::{Result, TranslationError};
use crate::core::models::GenerationOptions;

/// Model used when neither the environment nor the request names one
pub const DEFAULT_MODEL: &str = "gemma2:9b";

const DEFAULT_HOST: &str = "ollama";
const DEFAULT_PORT: u16 = 11434;

/// Configuration for the translation gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub backend_url: String,
    pub model: String,
    pub timeout_ms: u64,
    pub retry_on_network_error: bool,
    pub retry_delay_ms: u64,
    pub options: GenerationOptions,
    pub include_raw_output: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            backend_url: format!("http://{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: 300_000,
            retry_on_network_error: true,
            retry_delay_ms: 500,
            options: GenerationOptions::default(),
            include_raw_output: false,
        }
    }
}

/// Read an env var, falling back to `default` when unset
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", key, e)),
        _ => Ok(default),
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let backend_url = match std::env::var("OLLAMA_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => {
                let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
                let port: u16 = env_or("OLLAMA_PORT", DEFAULT_PORT)?;
                format!("http://{}:{}", host, port)
            }
        };

        let model = std::env::var("TRANSLATOR_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.model);

        let options = GenerationOptions {
            temperature: env_or("TEMPERATURE", defaults.options.temperature)?,
            top_p: env_or("TOP_P", defaults.options.top_p)?,
            num_ctx: env_or("NUM_CTX", defaults.options.num_ctx)?,
        };

        Ok(Self {
            backend_url,
            model,
            timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.timeout_ms)?,
            retry_on_network_error: env_or(
                "RETRY_ON_NETWORK_ERROR",
                defaults.retry_on_network_error,
            )?,
            retry_delay_ms: env_or("RETRY_DELAY_MS", defaults.retry_delay_ms)?,
            options,
            include_raw_output: env_or("INCLUDE_RAW_OUTPUT", defaults.include_raw_output)?,
        })
    }

    /// Backend base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let config_error = |message: &str| TranslationError::ConfigError {
            message: message.to_string(),
        };

        if self.backend_url.trim().is_empty() {
            return Err(config_error("backend URL is required"));
        }

        if !self.backend_url.starts_with("http://") && !self.backend_url.starts_with("https://") {
            return Err(config_error("backend URL must start with http:// or https://"));
        }

        if self.model.trim().is_empty() {
            return Err(config_error("model identifier is required"));
        }

        if self.timeout_ms == 0 {
            return Err(config_error("timeout_ms must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.options.top_p) {
            return Err(config_error("top_p must be between 0 and 1"));
        }

        if self.options.temperature < 0.0 {
            return Err(config_error("temperature must not be negative"));
        }

        if self.include_raw_output {
            warn!("Raw backend output will be included in responses");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GatewayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), "http://ollama:11434");
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = GatewayConfig {
            backend_url: "http://localhost:11434/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let no_scheme = GatewayConfig {
            backend_url: "localhost:11434".to_string(),
            ..Default::default()
        };
        assert!(no_scheme.validate().is_err());

        let no_model = GatewayConfig {
            model: " ".to_string(),
            ..Default::default()
        };
        assert!(no_model.validate().is_err());

        let zero_timeout = GatewayConfig {
            timeout_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_timeout.validate(),
            Err(TranslationError::ConfigError { .. })
        ));
    }
}
