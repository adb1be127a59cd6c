//! Config loader — reads `~/.penpal/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.penpal/config.json`
//! 3. Environment variables `PENPAL_<SECTION>__<FIELD>` (override JSON)
//! 4. Vendor key variables (`OPENAI_API_KEY`, …) fill keys that are still empty

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, LetterSettings};
use crate::letter::TEMPERATURE_RANGE;

/// Vendor environment variables holding each provider's API key.
pub const VENDOR_KEY_VARS: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("gemini", "GEMINI_API_KEY"),
    ("deepseek", "DEEPSEEK_API_KEY"),
    ("groq", "GROQ_API_KEY"),
    ("openrouter", "OPENROUTER_API_KEY"),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&content) {
        Ok(mut c) => {
            reset_out_of_range(&mut c.letters);
            c
        }
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Put file values the provider would reject back to their defaults.
fn reset_out_of_range(letters: &mut LetterSettings) {
    let defaults = LetterSettings::default();
    if !TEMPERATURE_RANGE.contains(&letters.temperature) {
        warn!(
            "Ignoring letters.temperature {} outside {:?}",
            letters.temperature, TEMPERATURE_RANGE
        );
        letters.temperature = defaults.temperature;
    }
    if letters.timeout_secs == 0 {
        warn!("Ignoring letters.timeoutSecs 0");
        letters.timeout_secs = defaults.timeout_secs;
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    // Ensure parent directory exists
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides(config, |key| std::env::var(key).ok())
}

/// Apply overrides read through `lookup`.
///
/// Env var format: `PENPAL_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `PENPAL_LETTERS__MODEL` → `letters.model`
/// - `PENPAL_LETTERS__MAX_TOKENS` → `letters.max_tokens`
/// - `PENPAL_LETTERS__TEMPERATURE` → `letters.temperature`
/// - `PENPAL_LETTERS__TIMEOUT_SECS` → `letters.timeout_secs`
/// - `PENPAL_LETTERS__LANGUAGE` → `letters.language`
/// - `PENPAL_LETTERS__JSON_MODE` → `letters.json_mode`
/// - `PENPAL_PROVIDERS__<NAME>__API_KEY` → `providers.<name>.api_key`
/// - `PENPAL_PROVIDERS__<NAME>__API_BASE` → `providers.<name>.api_base`
/// - `PENPAL_GATEWAY__HOST` → `gateway.host`
/// - `PENPAL_GATEWAY__PORT` → `gateway.port`
fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let letters = &mut config.letters;
    if let Some(val) = lookup("PENPAL_LETTERS__MODEL") {
        letters.model = val;
    }
    if let Some(val) = lookup("PENPAL_LETTERS__MAX_TOKENS") {
        match val.parse::<u32>() {
            Ok(n) => letters.max_tokens = n,
            Err(_) => warn!("Ignoring invalid PENPAL_LETTERS__MAX_TOKENS: {}", val),
        }
    }
    if let Some(val) = lookup("PENPAL_LETTERS__TEMPERATURE") {
        match val.parse::<f64>() {
            Ok(t) if TEMPERATURE_RANGE.contains(&t) => letters.temperature = t,
            _ => warn!("Ignoring invalid PENPAL_LETTERS__TEMPERATURE: {}", val),
        }
    }
    if let Some(val) = lookup("PENPAL_LETTERS__TIMEOUT_SECS") {
        match val.parse::<u64>() {
            Ok(s) if s > 0 => letters.timeout_secs = s,
            _ => warn!("Ignoring invalid PENPAL_LETTERS__TIMEOUT_SECS: {}", val),
        }
    }
    if let Some(val) = lookup("PENPAL_LETTERS__LANGUAGE") {
        match val.parse() {
            Ok(lang) => letters.language = lang,
            Err(e) => warn!("Ignoring PENPAL_LETTERS__LANGUAGE: {}", e),
        }
    }
    if let Some(val) = lookup("PENPAL_LETTERS__JSON_MODE") {
        letters.json_mode = val == "true" || val == "1";
    }

    // Provider keys and bases
    for name in super::schema::ProvidersConfig::NAMES {
        let upper = name.to_uppercase();
        if let Some(provider) = config.providers.get_by_name_mut(name) {
            if let Some(val) = lookup(&format!("PENPAL_PROVIDERS__{upper}__API_KEY")) {
                provider.api_key = val;
            }
            if let Some(val) = lookup(&format!("PENPAL_PROVIDERS__{upper}__API_BASE")) {
                provider.api_base = Some(val);
            }
        }
    }

    // Vendor variables only fill gaps
    for (name, var) in VENDOR_KEY_VARS {
        if let Some(provider) = config.providers.get_by_name_mut(name) {
            if provider.api_key.is_empty() {
                if let Some(val) = lookup(var).filter(|v| !v.is_empty()) {
                    debug!("Using {} for provider {}", var, name);
                    provider.api_key = val;
                }
            }
        }
    }

    // Gateway
    if let Some(val) = lookup("PENPAL_GATEWAY__HOST") {
        config.gateway.host = val;
    }
    if let Some(val) = lookup("PENPAL_GATEWAY__PORT") {
        match val.parse::<u16>() {
            Ok(p) => config.gateway.port = p,
            Err(_) => warn!("Ignoring invalid PENPAL_GATEWAY__PORT: {}", val),
        }
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
