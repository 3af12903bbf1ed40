use axon_core::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Errors that can occur during LLM dispatch
#[derive(Debug, Error)]
pub enum LlmError {
    /// Client sent a malformed or invalid request
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No backend is configured under the requested name
    #[error("no AI backend configured for '{name}'")]
    NotConfigured { name: String },

    /// Backend call failed; wraps the backend's own message
    #[error("provider {provider} request failed: {message}")]
    Provider { provider: String, message: String },

    /// Backend rejected the supplied credentials
    #[error("provider {provider} rejected the request credentials")]
    Unauthorized { provider: String },

    /// Backend denied access to the requested resource
    #[error("provider {provider} denied access")]
    Forbidden { provider: String },

    /// Backend reported throttling
    #[error("provider {provider} rate limited the request")]
    RateLimited { provider: String },
}

impl HttpError for LlmError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured { .. } | Self::Provider { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::NotConfigured { .. } => "not_configured",
            Self::Provider { .. } => "provider_error",
            Self::Unauthorized { .. } => "authentication_error",
            Self::Forbidden { .. } => "permission_error",
            Self::RateLimited { .. } => "rate_limit_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
