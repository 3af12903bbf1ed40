use axon_core::HttpError;
use axon_llm::LlmError;
use axon_mcp::McpError;
use axon_tools::ToolError;
use http::StatusCode;
use thiserror::Error;

/// Top-level routing errors
///
/// Aggregates the per-subsystem taxonomies and adds the router's own
/// kinds. Callers always receive exactly one typed error or one result.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Mcp(#[from] McpError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Request failed boundary validation
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No AI backend is configured at all
    #[error("no AI configurations available")]
    NoBackends,

    /// Operation is none of execute-query / invoke-tool / list-tools
    ///
    /// Names the operation and query only; tool server configs may carry
    /// injected credentials and are never echoed back.
    #[error("no action to perform for operation '{operation}' ({query})")]
    NoAction { operation: String, query: String },
}

impl HttpError for RouteError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Mcp(e) => e.status_code(),
            Self::Tool(e) => e.status_code(),
            Self::Llm(e) => e.status_code(),
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoBackends | Self::NoAction { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Mcp(e) => e.error_type(),
            Self::Tool(e) => e.error_type(),
            Self::Llm(e) => e.error_type(),
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::NoBackends => "not_configured",
            Self::NoAction { .. } => "no_action",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Mcp(e) => e.client_message(),
            Self::Tool(e) => e.client_message(),
            Self::Llm(e) => e.client_message(),
            other => other.to_string(),
        }
    }
}
