//! LLM Provider trait: the seam between the gateway and any model backend.
//!
//! The `HttpProvider` in `http_provider.rs` covers all OpenAI-compatible APIs;
//! tests substitute their own implementations.

use async_trait::async_trait;
use penpal_core::Result;

/// Configuration passed to each LLM call.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Ask the provider to constrain output to a JSON object.
    pub json_mode: bool,
}

impl Default for LlmRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
            json_mode: true,
        }
    }
}

impl LlmRequestConfig {
    /// Same settings, different temperature.
    pub fn with_temperature(&self, temperature: f64) -> Self {
        Self {
            temperature,
            ..self.clone()
        }
    }
}

/// Trait that all LLM providers must implement.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw completion text.
    ///
    /// Exactly one attempt is made. Errors:
    /// - [`penpal_core::Error::Provider`] — the provider answered non-2xx
    /// - [`penpal_core::Error::Transport`] — network failure or an undecodable reply
    async fn complete(&self, prompt: &str, config: &LlmRequestConfig) -> Result<String>;

    /// The model this provider instance sends requests for.
    fn default_model(&self) -> &str;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
