//! OpenAI chat completions backend

use async_trait::async_trait;
use axon_config::{AiConfig, ProviderKind};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use super::{ChatBackend, classify_upstream_status, max_tokens_option};
use crate::convert;
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiRequest, OpenAiResponse};
use crate::types::{ChatRequest, ChatResponse};

/// Default OpenAI API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat completions backend
pub struct OpenAiBackend {
    name: String,
    model: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    max_tokens: Option<u32>,
}

impl OpenAiBackend {
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
            max_tokens: max_tokens_option(config),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Openai
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let wire = convert::openai::request_to_openai(request, &self.model, self.max_tokens)?;
        let response = send_chat_completion(
            &self.client,
            &self.base_url,
            self.api_key.as_ref(),
            ProviderKind::Openai.as_str(),
            &wire,
        )
        .await?;

        convert::openai::response_to_chat(response)
    }
}

/// POST a chat completions request against an OpenAI-compatible endpoint
///
/// Shared with every backend speaking this wire format. Raw transport
/// errors never escape: they are wrapped into the provider error kinds.
pub(crate) async fn send_chat_completion(
    client: &Client,
    base_url: &Url,
    api_key: Option<&SecretString>,
    provider: &str,
    wire: &OpenAiRequest,
) -> Result<OpenAiResponse, LlmError> {
    let base = base_url.as_str().trim_end_matches('/');
    let mut builder = client.post(format!("{base}/chat/completions")).json(wire);

    if let Some(key) = api_key {
        builder = builder.bearer_auth(key.expose_secret());
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

    response.json().await.map_err(|e| LlmError::Provider {
        provider: provider.to_owned(),
        message: format!("failed to parse response: {e}"),
    })
}
