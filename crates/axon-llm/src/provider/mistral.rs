//! Mistral chat backend
//!
//! Mistral's chat API speaks the OpenAI-compatible wire format; only the
//! endpoint and the provider tag differ.

use async_trait::async_trait;
use axon_config::{AiConfig, ProviderKind};
use reqwest::Client;
use secrecy::SecretString;
use url::Url;

use super::openai::send_chat_completion;
use super::{ChatBackend, max_tokens_option};
use crate::convert;
use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse};

/// Default Mistral API base URL
const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Mistral chat backend
pub struct MistralBackend {
    name: String,
    model: String,
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    max_tokens: Option<u32>,
}

impl MistralBackend {
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
impl ChatBackend for MistralBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Mistral
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let wire = convert::openai::request_to_openai(request, &self.model, self.max_tokens)?;
        let response = send_chat_completion(
            &self.client,
            &self.base_url,
            self.api_key.as_ref(),
            ProviderKind::Mistral.as_str(),
            &wire,
        )
        .await?;

        convert::openai::response_to_chat(response)
    }
}
