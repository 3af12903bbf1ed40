//! Backend trait and implementations for LLM providers
//!
//! One backend is constructed per AI configuration when the dispatcher
//! is built; selection happens once at configuration time, never
//! re-dispatched per call.

pub mod anthropic;
pub mod mistral;
pub mod openai;

use async_trait::async_trait;
use axon_config::{AiConfig, ProviderKind};
use http::StatusCode;

use crate::error::LlmError;
use crate::types::{ChatRequest, ChatResponse};

/// Trait implemented by each LLM provider backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Name of the AI configuration this backend serves
    fn name(&self) -> &str;

    /// Provider protocol spoken by this backend
    fn kind(&self) -> ProviderKind;

    /// Send a non-streaming chat request
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

/// Classify a non-success upstream status into the error taxonomy
///
/// Credential and throttling failures keep their own kinds; everything
/// else wraps the backend's message.
pub(crate) fn classify_upstream_status(provider: &str, status: StatusCode, body: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED => LlmError::Unauthorized {
            provider: provider.to_owned(),
        },
        StatusCode::FORBIDDEN => LlmError::Forbidden {
            provider: provider.to_owned(),
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider: provider.to_owned(),
        },
        _ => LlmError::Provider {
            provider: provider.to_owned(),
            message: format!("returned {status}: {body}"),
        },
    }
}

/// Read an optional `max_tokens` override from provider options
pub(crate) fn max_tokens_option(config: &AiConfig) -> Option<u32> {
    config
        .provider_options
        .get("max_tokens")
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_statuses_keep_their_kind() {
        assert!(matches!(
            classify_upstream_status("openai", StatusCode::UNAUTHORIZED, ""),
            LlmError::Unauthorized { .. }
        ));
        assert!(matches!(
            classify_upstream_status("openai", StatusCode::FORBIDDEN, ""),
            LlmError::Forbidden { .. }
        ));
        assert!(matches!(
            classify_upstream_status("openai", StatusCode::TOO_MANY_REQUESTS, ""),
            LlmError::RateLimited { .. }
        ));
    }

    #[test]
    fn other_statuses_wrap_the_backend_message() {
        let error = classify_upstream_status("openai", StatusCode::BAD_GATEWAY, "overloaded");
        match error {
            LlmError::Provider { message, .. } => assert!(message.contains("overloaded")),
            other => panic!("expected Provider, got {other:?}"),
        }
    }
}
