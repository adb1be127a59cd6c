//! HTTP client for OpenAI-compatible chat completion APIs.
//!
//! Talks directly to any `/chat/completions` endpoint: OpenAI, Anthropic's
//! compatibility layer, Gemini, DeepSeek, Groq, OpenRouter.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::{debug, error, trace, warn};

use penpal_core::config::LetterSettings;
use penpal_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message, ResponseFormat};
use penpal_core::utils::truncate_string;
use penpal_core::{Error, Result};

use crate::registry::{ProviderConfig, ProviderSpec};
use crate::traits::{LlmProvider, LlmRequestConfig};

/// Cap on the provider error body written to the log.
const MAX_LOGGED_BODY_CHARS: usize = 500;

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// One configured provider endpoint plus the settings every call uses.
pub struct HttpProvider {
    /// Connection-pooled; cloned handles share the pool.
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication. May be empty.
    api_key: String,
    /// Model every request is sent for.
    model: String,
    /// System message sent ahead of the prompt.
    system_prompt: String,
    /// Extra headers to send with each request.
    extra_headers: HeaderMap,
    /// Reference to the provider spec, for naming.
    spec: &'static ProviderSpec,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("provider", &self.spec.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Build a provider for `spec`, using the slot's credentials and the letter settings.
    ///
    /// # Arguments
    /// * `config`: slot credentials (api_key, api_base, extra_headers)
    /// * `spec`: registry entry supplying the default base URL
    /// * `settings`: model, system prompt and timeout
    pub fn new(
        config: &ProviderConfig,
        spec: &'static ProviderSpec,
        settings: &LetterSettings,
    ) -> Self {
        // Resolve API base: config > spec default
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| spec.default_api_base.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        HttpProvider {
            client,
            api_base,
            api_key: config.api_key.clone(),
            model: settings.model.clone(),
            system_prompt: settings.system_prompt.clone(),
            extra_headers: header_map(config.extra_headers.as_ref()),
            spec,
        }
    }

    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    fn build_request(&self, prompt: &str, config: &LlmRequestConfig) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(Message::system(self.system_prompt.as_str()));
        }
        messages.push(Message::user(prompt));

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
            response_format: config.json_mode.then(ResponseFormat::json_object),
        }
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn complete(&self, prompt: &str, config: &LlmRequestConfig) -> Result<String> {
        debug!(
            provider = self.spec.display_name,
            model = %self.model,
            prompt_len = prompt.len(),
            temperature = config.temperature,
            json_mode = config.json_mode,
            "Calling LLM"
        );
        trace!(prompt = %prompt, "LLM prompt");

        let request_body = self.build_request(prompt, config);

        let mut request = self
            .client
            .post(self.completions_url())
            .headers(self.extra_headers.clone())
            .json(&request_body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = self.spec.display_name, error = %e, "HTTP request failed");
            if e.is_timeout() {
                Error::Transport("request to model provider timed out".to_string())
            } else {
                Error::Transport(format!("error calling model provider: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = self.spec.display_name,
                status = %status,
                body = %truncate_string(&error_text, MAX_LOGGED_BODY_CHARS),
                "API error"
            );
            return Err(Error::Provider {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_resp = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            error!(
                provider = self.spec.display_name,
                error = %e,
                "Failed to parse LLM response"
            );
            Error::Transport(format!("error parsing model provider response: {}", e))
        })?;

        let usage = chat_resp.usage.clone();
        let content = chat_resp.first_content().ok_or_else(|| {
            error!(provider = self.spec.display_name, "No content in LLM response");
            Error::Transport("model provider returned no content".to_string())
        })?;

        debug!(
            provider = self.spec.display_name,
            content_len = content.len(),
            total_tokens = usage.map(|u| u.total_tokens),
            "LLM response received"
        );
        Ok(content)
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn display_name(&self) -> &str {
        self.spec.display_name
    }
}

/// Convert configured extra headers, skipping (and logging) invalid ones.
fn header_map(headers: Option<&std::collections::HashMap<String, String>>) -> HeaderMap {
    headers
        .into_iter()
        .flatten()
        .filter_map(|(key, value)| {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(val)) => Some((name, val)),
                _ => {
                    warn!(header = %key, "Skipping invalid extra header");
                    None
                }
            }
        })
        .collect()
}

// ─────────────────────────────────────────────
// Builders (convenience)
// ─────────────────────────────────────────────

/// Build an HttpProvider from the letter settings and a map of provider configs.
///
/// Main entry point: the model name picks the provider slot to use.
pub fn create_provider(
    settings: &LetterSettings,
    providers: &std::collections::HashMap<String, ProviderConfig>,
) -> std::result::Result<HttpProvider, String> {
    let model = settings.model.as_str();
    let (config, spec) = crate::registry::match_provider(model, providers).ok_or_else(|| {
        format!(
            "No configured provider found for model '{}'. \
             Set the appropriate API key (e.g. OPENAI_API_KEY, ANTHROPIC_API_KEY).",
            model
        )
    })?;

    debug!(
        provider = spec.display_name,
        model = model,
        api_base = config.api_base.as_deref().unwrap_or("default"),
        "Creating LLM provider"
    );

    Ok(HttpProvider::new(config, spec, settings))
}

/// A provider without an API key, for when nothing is configured.
///
/// Startup does not fail on a missing key: requests reach the provider
/// unauthenticated and its rejection is passed back to the caller.
pub fn unauthenticated_provider(settings: &LetterSettings) -> HttpProvider {
    let spec = crate::registry::find_by_model(&settings.model)
        .unwrap_or(&crate::registry::PROVIDERS[0]);
    HttpProvider::new(&ProviderConfig::default(), spec, settings)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find_by_name;
    use std::collections::HashMap;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn make_config(api_key: &str, api_base: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_base: api_base.map(String::from),
            extra_headers: None,
        }
    }

    fn make_provider(api_key: &str, api_base: &str) -> HttpProvider {
        let spec = find_by_name("openai").unwrap();
        HttpProvider::new(
            &make_config(api_key, Some(api_base)),
            spec,
            &LetterSettings::default(),
        )
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 5,
                "total_tokens": 15
            }
        })
    }

    // ── Unit tests ──

    #[test]
    fn test_completions_url_trailing_slash() {
        let provider = make_provider("key", "https://api.openai.com/v1/");
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_default_api_base_from_spec() {
        let spec = find_by_name("groq").unwrap();
        let provider = HttpProvider::new(&make_config("k", None), spec, &LetterSettings::default());
        assert_eq!(provider.api_base, "https://api.groq.com/openai/v1");
        assert_eq!(provider.display_name(), "Groq");
    }

    #[test]
    fn test_config_overrides_default_base() {
        let provider = make_provider("k", "https://custom.proxy.com/v1");
        assert_eq!(provider.api_base, "https://custom.proxy.com/v1");
    }

    #[test]
    fn test_extra_headers() {
        let spec = find_by_name("openrouter").unwrap();
        let mut headers = HashMap::new();
        headers.insert("X-Title".to_string(), "penpal".to_string());
        let config = ProviderConfig {
            api_key: "key".to_string(),
            api_base: None,
            extra_headers: Some(headers),
        };
        let provider = HttpProvider::new(&config, spec, &LetterSettings::default());
        assert!(provider.extra_headers.contains_key("x-title"));
    }

    #[test]
    fn test_build_request_messages() {
        let provider = make_provider("k", "http://localhost");
        let req = provider.build_request("write it", &LlmRequestConfig::default());
        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(
            req.messages,
            vec![
                Message::system("You are a helpful assistant."),
                Message::user("write it"),
            ]
        );
        assert_eq!(req.max_tokens, Some(1000));
        assert_eq!(req.response_format, Some(ResponseFormat::json_object()));
    }

    #[test]
    fn test_build_request_without_json_mode_or_system_prompt() {
        let spec = find_by_name("openai").unwrap();
        let settings = LetterSettings {
            system_prompt: String::new(),
            ..Default::default()
        };
        let provider = HttpProvider::new(&make_config("k", None), spec, &settings);
        let config = LlmRequestConfig {
            json_mode: false,
            ..Default::default()
        };
        let req = provider.build_request("p", &config);
        assert_eq!(req.messages, vec![Message::user("p")]);
        assert!(req.response_format.is_none());
    }

    // ── Integration tests with mock server ──

    #[tokio::test]
    async fn test_complete_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"generated_letter": "Dear Min,"}"#)),
            )
            .mount(&mock_server)
            .await;

        let provider = make_provider("test-key-123", &mock_server.uri());
        let text = provider
            .complete("prompt", &LlmRequestConfig::default())
            .await
            .unwrap();

        assert_eq!(text, r#"{"generated_letter": "Dear Min,"}"#);
    }

    #[tokio::test]
    async fn test_complete_sends_correct_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "max_tokens": 1000,
                "temperature": 0.3,
                "response_format": { "type": "json_object" },
                "messages": [
                    { "role": "system", "content": "You are a helpful assistant." },
                    { "role": "user", "content": "the prompt" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = make_provider("key", &mock_server.uri());
        let config = LlmRequestConfig::default().with_temperature(0.3);
        let text = provider.complete("the prompt", &config).await.unwrap();

        // If the body matcher fails, wiremock returns 404 → we'd get an error
        assert_eq!(text, "ok");
    }

    #[tokio::test]
    async fn test_complete_without_key_sends_no_auth_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(|req: &Request| {
                if req.headers.contains_key("authorization") {
                    ResponseTemplate::new(500)
                } else {
                    ResponseTemplate::new(401).set_body_string("missing api key")
                }
            })
            .mount(&mock_server)
            .await;

        let provider = make_provider("", &mock_server.uri());
        let err = provider
            .complete("p", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            Error::Provider {
                status: 401,
                message: "missing api key".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_complete_api_error_keeps_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {
                    "message": "Rate limit exceeded",
                    "type": "rate_limit_error"
                }
            })))
            .mount(&mock_server)
            .await;

        let provider = make_provider("key", &mock_server.uri());
        let err = provider
            .complete("Hello", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        match err {
            Error::Provider { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("Rate limit exceeded"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_api_error_body_passed_whole() {
        let mock_server = MockServer::start().await;
        let body = format!("{}END", "x".repeat(800));

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_string(body.clone()))
            .mount(&mock_server)
            .await;

        let provider = make_provider("key", &mock_server.uri());
        let err = provider
            .complete("Hello", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        match err {
            Error::Provider { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, body);
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_network_error() {
        // Point to a port that's not listening
        let provider = make_provider("key", "http://127.0.0.1:1");
        let err = provider
            .complete("Hello", &LlmRequestConfig::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_complete_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let spec = find_by_name("openai").unwrap();
        let settings = LetterSettings {
            timeout_secs: 1,
            ..Default::default()
        };
        let provider =
            HttpProvider::new(&make_config("k", Some(&mock_server.uri())), spec, &settings);

        let err = provider
            .complete("p", &LlmRequestConfig::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Transport("request to model provider timed out".to_string())
        );
    }

    #[tokio::test]
    async fn test_complete_not_a_chat_completion() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&mock_server)
            .await;

        let provider = make_provider("key", &mock_server.uri());
        let err = provider
            .complete("p", &LlmRequestConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(msg) if msg.contains("parsing")));
    }

    #[tokio::test]
    async fn test_complete_no_choices() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-empty",
                "choices": [],
                "usage": null
            })))
            .mount(&mock_server)
            .await;

        let provider = make_provider("key", &mock_server.uri());
        let err = provider
            .complete("p", &LlmRequestConfig::default())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Transport("model provider returned no content".to_string())
        );
    }

    // ── create_provider ──

    #[test]
    fn test_create_provider_success() {
        let mut providers = HashMap::new();
        providers.insert("anthropic".to_string(), make_config("sk-ant-123", None));

        let settings = LetterSettings {
            model: "claude-3-5-haiku-latest".to_string(),
            ..Default::default()
        };
        let provider = create_provider(&settings, &providers).unwrap();
        assert_eq!(provider.display_name(), "Anthropic");
        assert_eq!(provider.default_model(), "claude-3-5-haiku-latest");
    }

    #[test]
    fn test_create_provider_no_config() {
        let providers = HashMap::new();
        let err = create_provider(&LetterSettings::default(), &providers).unwrap_err();
        assert!(err.contains("No configured provider"));
        assert!(err.contains("gpt-4o-mini"));
    }

    #[test]
    fn test_unauthenticated_provider_uses_model_spec() {
        let provider = unauthenticated_provider(&LetterSettings::default());
        assert_eq!(provider.display_name(), "OpenAI");
        assert!(provider.api_key.is_empty());

        let settings = LetterSettings {
            model: "mystery-model".to_string(),
            ..Default::default()
        };
        assert_eq!(unauthenticated_provider(&settings).display_name(), "OpenAI");
    }
}
