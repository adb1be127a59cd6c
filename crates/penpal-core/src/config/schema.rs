//! Configuration schema.
//!
//! Hierarchy: `Config` → `LetterSettings`, `ProvidersConfig`, `GatewayConfig`.
//!
//! Keys are camelCase on disk. Every struct is `#[serde(default)]`, so a
//! partial file fills the rest from defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::prompt::PromptLanguage;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.penpal/config.json` + env vars.
///
/// Built once at startup and handed to the provider and the router; request
/// handling never reads the environment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub letters: LetterSettings,
    pub providers: ProvidersConfig,
    pub gateway: GatewayConfig,
}

// ─────────────────────────────────────────────
// Letters
// ─────────────────────────────────────────────

/// Model and prompt settings shared by every endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LetterSettings {
    /// Model identifier; also selects the provider.
    pub model: String,
    /// Maximum tokens to generate per completion.
    pub max_tokens: u32,
    /// Temperature for style analysis and the first letter turn.
    pub temperature: f64,
    /// System message sent ahead of every prompt.
    pub system_prompt: String,
    /// Ask the provider for JSON mode (`response_format: json_object`).
    pub json_mode: bool,
    /// Provider request timeout, in seconds.
    pub timeout_secs: u64,
    /// Language of the instruction templates.
    pub language: PromptLanguage,
}

impl Default for LetterSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            system_prompt: "You are a helpful assistant.".to_string(),
            json_mode: true,
            timeout_secs: 120,
            language: PromptLanguage::Korean,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Credentials and endpoint for one provider slot.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// Bearer token. Empty means the slot is unused.
    pub api_key: String,
    /// Overrides the registry's default API base.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Sent with every request to this provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Declares `ProvidersConfig` with one field per slot, plus name-based lookup.
macro_rules! provider_slots {
    ($($slot:ident),+ $(,)?) => {
        /// All provider configurations, one per supported backend.
        #[derive(Clone, Debug, Default, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct ProvidersConfig {
            $(pub $slot: ProviderConfig,)+
        }

        impl ProvidersConfig {
            /// Names of all provider slots, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$(stringify!($slot)),+];

            /// Look up a slot by name (e.g. `"openai"`).
            pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
                $(if name == stringify!($slot) {
                    return Some(&self.$slot);
                })+
                None
            }

            /// Mutable lookup, used by env var overrides.
            pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
                $(if name == stringify!($slot) {
                    return Some(&mut self.$slot);
                })+
                None
            }
        }
    };
}

provider_slots!(openai, anthropic, gemini, deepseek, groq, openrouter);

impl ProvidersConfig {
    /// Every slot keyed by name, the shape the provider registry matches against.
    pub fn to_map(&self) -> HashMap<String, ProviderConfig> {
        Self::NAMES
            .iter()
            .filter_map(|name| Some((name.to_string(), self.get_by_name(name)?.clone())))
            .collect()
    }
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl GatewayConfig {
    /// `host:port`, ready for a socket bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
