use serde::{Deserialize, Serialize};

use super::message::Message;
use super::tool::{ToolChoice, ToolDefinition};

/// Canonical chat/tool request
///
/// The model is not part of the request: it comes from the selected AI
/// configuration at dispatch time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Tool definitions available to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// How the model should select tools
    #[serde(default, alias = "toolChoice", skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Whether the model may request several tool calls at once
    #[serde(default, alias = "parallelToolCalls", skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
}
