//! Per-server OAuth token injection
//!
//! Callers may supply bearer tokens for individual tool servers
//! out-of-band through one well-known request header. Everything here is
//! a pure transformation of configuration values: nothing connects,
//! nothing mutates its input.

use std::collections::HashMap;

use axon_config::{ToolServerConfig, ToolServerSet, ToolServerTransport};
use http::HeaderMap;

use crate::error::McpError;

/// Request header carrying a JSON object of server-name → bearer token
pub const OAUTH_TOKENS_HEADER: &str = "x-mcp-oauth-tokens";

/// Extract per-server tokens from request headers
///
/// Absent header returns `None`. A header that is present but not a
/// valid JSON object of strings is a client error.
pub fn extract_tokens(headers: &HeaderMap) -> Result<Option<HashMap<String, String>>, McpError> {
    let Some(value) = headers.get(OAUTH_TOKENS_HEADER) else {
        return Ok(None);
    };

    let raw = value
        .to_str()
        .map_err(|e| McpError::InvalidTokenHeader(format!("header is not valid UTF-8: {e}")))?;

    let tokens: HashMap<String, String> =
        serde_json::from_str(raw).map_err(|e| McpError::InvalidTokenHeader(e.to_string()))?;

    Ok(Some(tokens))
}

/// Return a copy of `config` carrying `token` as its Authorization header
///
/// Only HTTP-style transports can carry a header; a stdio transport is
/// returned unchanged even when a token is supplied. The token must
/// already include its scheme prefix (e.g. `"Bearer …"`).
pub fn inject_token(config: &ToolServerConfig, server: &str, token: &str) -> Result<ToolServerConfig, McpError> {
    let mut injected = config.clone();

    match &mut injected.transport {
        ToolServerTransport::Stdio(_) => {}
        ToolServerTransport::Sse(http) | ToolServerTransport::StreamableHttp(http) => {
            validate_scheme(server, token)?;
            http.headers.insert("Authorization".to_owned(), token.to_owned());
        }
    }

    Ok(injected)
}

/// Apply [`inject_token`] across every server in the set
///
/// Servers without a matching token pass through unchanged; an absent
/// token map returns the set unchanged.
pub fn inject_tokens(
    set: &ToolServerSet,
    tokens: Option<&HashMap<String, String>>,
) -> Result<ToolServerSet, McpError> {
    let Some(tokens) = tokens else {
        return Ok(set.clone());
    };

    let mut injected = set.clone();
    for (name, config) in &mut injected.servers {
        if let Some(token) = tokens.get(name) {
            *config = inject_token(config, name, token)?;
        }
    }

    Ok(injected)
}

/// A bearer token must arrive as `<scheme> <credentials>`
fn validate_scheme(server: &str, token: &str) -> Result<(), McpError> {
    let valid = token
        .split_once(' ')
        .is_some_and(|(scheme, rest)| !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphabetic()) && !rest.trim().is_empty());

    if valid {
        Ok(())
    } else {
        Err(McpError::MissingTokenScheme {
            server: server.to_owned(),
        })
    }
}
