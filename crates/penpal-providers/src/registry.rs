//! Provider registry: static specs for the supported LLM backends.
//!
//! Every backend here speaks the OpenAI chat completions dialect, so a spec
//! only needs to say how to recognize a model and where to send it.

use std::collections::HashMap;

pub use penpal_core::config::ProviderConfig;

/// Static description of one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Config slot name, e.g. `"openrouter"`.
    pub name: &'static str,
    /// Lowercase substrings that identify this provider's models.
    pub keywords: &'static [&'static str],
    /// Vendor env var holding the API key.
    pub env_key: &'static str,
    /// Name shown in logs and `penpal status`.
    pub display_name: &'static str,
    /// Aggregators serve any model name and are only used as fallback.
    pub is_gateway: bool,
    /// OpenAI-compatible API base URL.
    pub default_api_base: &'static str,
}

impl ProviderSpec {
    const fn direct(
        name: &'static str,
        display_name: &'static str,
        keywords: &'static [&'static str],
        env_key: &'static str,
        default_api_base: &'static str,
    ) -> Self {
        ProviderSpec {
            name,
            keywords,
            env_key,
            display_name,
            is_gateway: false,
            default_api_base,
        }
    }

    const fn gateway(
        name: &'static str,
        display_name: &'static str,
        env_key: &'static str,
        default_api_base: &'static str,
    ) -> Self {
        ProviderSpec {
            name,
            keywords: &[],
            env_key,
            display_name,
            is_gateway: true,
            default_api_base,
        }
    }

    fn serves(&self, model_lower: &str) -> bool {
        !self.is_gateway && self.keywords.iter().any(|kw| model_lower.contains(kw))
    }
}

/// Supported providers, in matching priority order.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec::direct(
        "openai",
        "OpenAI",
        &["openai", "gpt"],
        "OPENAI_API_KEY",
        "https://api.openai.com/v1",
    ),
    // OpenAI SDK compatibility layer
    ProviderSpec::direct(
        "anthropic",
        "Anthropic",
        &["anthropic", "claude"],
        "ANTHROPIC_API_KEY",
        "https://api.anthropic.com/v1",
    ),
    ProviderSpec::direct(
        "gemini",
        "Gemini",
        &["gemini"],
        "GEMINI_API_KEY",
        "https://generativelanguage.googleapis.com/v1beta/openai",
    ),
    ProviderSpec::direct(
        "deepseek",
        "DeepSeek",
        &["deepseek"],
        "DEEPSEEK_API_KEY",
        "https://api.deepseek.com/v1",
    ),
    ProviderSpec::direct(
        "groq",
        "Groq",
        &["groq"],
        "GROQ_API_KEY",
        "https://api.groq.com/openai/v1",
    ),
    ProviderSpec::gateway(
        "openrouter",
        "OpenRouter",
        "OPENROUTER_API_KEY",
        "https://openrouter.ai/api/v1",
    ),
];

// ─────────────────────────────────────────────
// Matching
// ─────────────────────────────────────────────

/// First non-gateway provider whose keywords appear in `model` (case-insensitive).
pub fn find_by_model(model: &str) -> Option<&'static ProviderSpec> {
    let model_lower = model.to_lowercase();
    PROVIDERS.iter().find(|spec| spec.serves(&model_lower))
}

pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Pick the provider slot to send `model` to.
///
/// The keyword-matched provider wins if its slot has a key. Otherwise the
/// first gateway with a key is used.
pub fn match_provider<'a>(
    model: &str,
    providers: &'a HashMap<String, ProviderConfig>,
) -> Option<(&'a ProviderConfig, &'static ProviderSpec)> {
    let configured = move |spec: &'static ProviderSpec| {
        providers
            .get(spec.name)
            .filter(|c| c.is_configured())
            .map(|c| (c, spec))
    };

    find_by_model(model).and_then(configured).or_else(|| {
        PROVIDERS
            .iter()
            .filter(|s| s.is_gateway)
            .find_map(configured)
    })
}
