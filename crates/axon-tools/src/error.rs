use axon_core::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Tool registry errors
#[derive(Debug, Error)]
pub enum ToolError {
    /// No registered tool answers to the requested name
    #[error("tool not found: {tool}")]
    NotFound { tool: String },

    /// The underlying tool failed during invocation
    #[error("tool {tool} failed: {message}")]
    Execution { tool: String, message: String },

    /// Two distinct tool names sanitize to the same identifier
    #[error("tool name collision: '{first}' and '{second}' both resolve to '{sanitized}'")]
    NameCollision {
        first: String,
        second: String,
        sanitized: String,
    },
}

impl HttpError for ToolError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Execution { .. } | Self::NameCollision { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::NotFound { .. } => "not_found_error",
            Self::Execution { .. } => "tool_execution_error",
            Self::NameCollision { .. } => "configuration_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
