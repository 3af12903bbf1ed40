//! Anthropic Messages API backend

use async_trait::async_trait;
use axon_config::{AiConfig, ProviderKind};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ChatBackend, classify_upstream_status, max_tokens_option};
use crate::convert;
use crate::error::LlmError;
use crate::protocol::anthropic::AnthropicResponse;
use crate::types::{ChatRequest, ChatResponse};

/// Default Anthropic API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The Messages API requires max_tokens; used when the configuration
/// does not override it
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic Messages API backend
pub struct AnthropicBackend {
    name: String,
    model: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    max_tokens: u32,
}

impl AnthropicBackend {
    /// Create from an AI configuration
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded default base URL is invalid (should never
    /// happen).
    pub fn new(config: &AiConfig) -> Self {
        let base_url = config
            .credentials
            .base_url
            .clone()
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        Self {
            name: config.name.clone(),
            model: config.model.clone(),
            client: Client::new(),
            base_url,
            api_key: config.credentials.api_key.clone(),
            max_tokens: max_tokens_option(config).unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    fn messages_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/messages")
    }
}

#[async_trait]
impl ChatBackend for AnthropicBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let provider = ProviderKind::Anthropic.as_str();
        let wire = convert::anthropic::request_to_anthropic(request, &self.model, self.max_tokens)?;

        let mut builder = self
            .client
            .post(self.messages_url())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&wire);

        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| LlmError::Provider {
            provider: provider.to_owned(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_upstream_status(provider, status, &body));
        }

        let wire_response: AnthropicResponse = response.json().await.map_err(|e| LlmError::Provider {
            provider: provider.to_owned(),
            message: format!("failed to parse response: {e}"),
        })?;

        Ok(convert::anthropic::response_to_chat(wire_response))
    }
}
