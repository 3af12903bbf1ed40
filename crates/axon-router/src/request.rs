//! Request boundary types and validation
//!
//! The surrounding HTTP layer hands over loosely-shaped input; this
//! module turns it into explicit, validated types before any component
//! sees it.

use axon_config::ToolServerSet;
use axon_llm::types::{Message, validate_message_sequence};
use axon_llm::ChatRequest;
use http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::RouteError;

/// Operation name for an LLM query
pub const OP_EXECUTE_QUERY: &str = "execute-query";
/// Operation name for a direct tool invocation
pub const OP_INVOKE_TOOL: &str = "invoke-tool";
/// Operation name for tool enumeration
pub const OP_LIST_TOOLS: &str = "list-tools";

/// One top-level routing request
#[derive(Debug, Default)]
pub struct RouteRequest {
    /// Requested operation
    pub operation: String,
    /// Query parameters
    pub query: RouteQuery,
    /// Raw request body; shape depends on the operation
    pub body: Option<Value>,
    /// Tool servers to federate for this request
    pub tool_servers: Option<ToolServerSet>,
    /// Caller's request headers (OAuth token source)
    pub headers: HeaderMap,
}

/// Query parameters accompanying a routing request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    /// AI configuration to use for execute-query
    #[serde(default)]
    pub config_name: Option<String>,
    /// Tool to run for invoke-tool
    #[serde(default)]
    pub tool_name: Option<String>,
}

impl RouteQuery {
    /// Loggable description; never includes credential material
    pub fn describe(&self) -> String {
        format!(
            "configName={}, toolName={}",
            self.config_name.as_deref().unwrap_or("-"),
            self.tool_name.as_deref().unwrap_or("-")
        )
    }
}

/// Chat body as `{inputs: [...]}`, the alternative wire shape
#[derive(Debug, Deserialize)]
struct InputsBody {
    inputs: Vec<Message>,
}

/// Validate an execute-query body into the canonical request
///
/// Accepts either `{messages, tools?, toolChoice?, parallelToolCalls?}`
/// or `{inputs}`; anything else is a client error. The tool-call linkage
/// invariant is enforced here so downstream components can assume
/// well-formed input.
pub fn parse_chat_body(body: Option<&Value>) -> Result<ChatRequest, RouteError> {
    let Some(body) = body else {
        return Err(RouteError::InvalidRequest(
            "execute-query requires a request body".to_owned(),
        ));
    };

    let Some(object) = body.as_object() else {
        return Err(RouteError::InvalidRequest(
            "request body must be a JSON object".to_owned(),
        ));
    };

    let request = if object.contains_key("messages") {
        serde_json::from_value::<ChatRequest>(body.clone())
            .map_err(|e| RouteError::InvalidRequest(format!("malformed chat body: {e}")))?
    } else if object.contains_key("inputs") {
        let inputs = serde_json::from_value::<InputsBody>(body.clone())
            .map_err(|e| RouteError::InvalidRequest(format!("malformed inputs body: {e}")))?;
        ChatRequest {
            messages: inputs.inputs,
            ..ChatRequest::default()
        }
    } else {
        return Err(RouteError::InvalidRequest(
            "request body must contain either 'messages' or 'inputs'".to_owned(),
        ));
    };

    validate_message_sequence(&request.messages)?;

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_body_parses() {
        let body = serde_json::json!({
            "messages": [{"role": "user", "content": "hello"}]
        });

        let request = parse_chat_body(Some(&body)).expect("valid body");
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn inputs_body_parses() {
        let body = serde_json::json!({
            "inputs": [{"role": "user", "content": "hello"}]
        });

        let request = parse_chat_body(Some(&body)).expect("valid body");
        assert_eq!(request.messages.len(), 1);
        assert!(request.tools.is_none());
    }

    #[test]
    fn missing_body_is_rejected() {
        assert!(matches!(parse_chat_body(None), Err(RouteError::InvalidRequest(_))));
    }

    #[test]
    fn body_with_neither_shape_is_rejected() {
        let body = serde_json::json!({"prompt": "hello"});
        assert!(matches!(
            parse_chat_body(Some(&body)),
            Err(RouteError::InvalidRequest(_))
        ));
    }

    #[test]
    fn broken_tool_call_linkage_is_rejected() {
        let body = serde_json::json!({
            "messages": [
                {"role": "user", "content": "hi"},
                {"role": "tool", "content": "out", "tool_call_id": "call_unknown"}
            ]
        });

        assert!(matches!(parse_chat_body(Some(&body)), Err(RouteError::Llm(_))));
    }

    #[test]
    fn query_description_shows_names_only() {
        let query = RouteQuery {
            config_name: Some("primary".to_owned()),
            tool_name: None,
        };
        assert_eq!(query.describe(), "configName=primary, toolName=-");
    }
}
