use serde::{Deserialize, Serialize};

use super::message::ToolCall;

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Model requested one or more tool calls
    ToolCalls,
}

/// Token usage statistics
///
/// Providers that omit usage metadata get all-zero counts rather than an
/// absent field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion)
    pub total_tokens: u32,
}

/// Assistant message within a canonical response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    /// Always "assistant"
    pub role: String,
    /// Text content, absent when the model only called tools
    pub content: Option<String>,
    /// Tool calls requested by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// Canonical response every provider adapter must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Provider-assigned response identifier
    pub id: String,
    /// Model that produced the response
    pub model: String,
    /// Generated assistant message
    pub message: ResponseMessage,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Token usage statistics
    pub usage: Usage,
}
