//! Shared handler state.

use std::sync::Arc;

use penpal_core::config::LetterSettings;
use penpal_providers::{LlmProvider, LlmRequestConfig};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn LlmProvider>,
    pub settings: Arc<LetterSettings>,
}

impl AppState {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: LetterSettings) -> Self {
        Self {
            provider,
            settings: Arc::new(settings),
        }
    }

    /// Per-call provider settings at the configured temperature.
    pub fn request_config(&self) -> LlmRequestConfig {
        LlmRequestConfig {
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            json_mode: self.settings.json_mode,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("provider", &self.provider.display_name())
            .field("model", &self.provider.default_model())
            .finish()
    }
}
