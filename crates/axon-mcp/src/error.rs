use axon_core::HttpError;
use http::StatusCode;
use thiserror::Error;

/// Tool server subsystem errors
#[derive(Debug, Error)]
pub enum McpError {
    /// Nothing listening: connection refused, DNS failure, timeout,
    /// spawn failure
    #[error("tool server {server} unreachable: {message}")]
    Unreachable { server: String, message: String },

    /// Server reachable but misbehaving at the protocol level
    #[error("tool server {server} failed: {message}")]
    Protocol { server: String, message: String },

    /// Connection was never opened or already released
    #[error("tool server {server} connection is closed")]
    Closed { server: String },

    /// Server configuration cannot be turned into a usable transport
    #[error("tool server {server} misconfigured: {message}")]
    InvalidConfig { server: String, message: String },

    /// OAuth tokens header present but not a valid JSON object
    #[error("invalid OAuth tokens header: {0}")]
    InvalidTokenHeader(String),

    /// OAuth token supplied without its scheme prefix
    #[error("OAuth token for tool server {server} is missing its scheme prefix")]
    MissingTokenScheme { server: String },
}

impl McpError {
    /// Whether this failure means "nothing listening" rather than
    /// "listening but broken"
    ///
    /// Callers treat the two differently: an unreachable server is an
    /// operational condition worth a warning, a broken one is an error.
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

impl HttpError for McpError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unreachable { .. } | Self::Protocol { .. } | Self::Closed { .. } => StatusCode::BAD_GATEWAY,
            Self::InvalidConfig { .. } | Self::InvalidTokenHeader(_) | Self::MissingTokenScheme { .. } => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Unreachable { .. } => "connection_error",
            Self::Protocol { .. } | Self::Closed { .. } => "tool_server_error",
            Self::InvalidConfig { .. } | Self::InvalidTokenHeader(_) | Self::MissingTokenScheme { .. } => {
                "invalid_request_error"
            }
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
