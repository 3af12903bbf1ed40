//! Bidirectional translation between canonical and provider wire shapes

pub mod anthropic;
pub mod openai;

use serde_json::Value;

use crate::error::LlmError;

/// Generated id for tool calls whose provider omitted one
pub(crate) fn fallback_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}

/// Decode a tool call's JSON-encoded arguments
///
/// A malformed arguments string is a client error naming the offending
/// tool.
pub(crate) fn decode_arguments(tool: &str, arguments: &str) -> Result<Value, LlmError> {
    serde_json::from_str(arguments)
        .map_err(|_| LlmError::InvalidRequest(format!("tool call '{tool}' carries malformed JSON arguments")))
}
