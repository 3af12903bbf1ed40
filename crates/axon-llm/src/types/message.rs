use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// Tool/function result
    Tool,
}

/// Message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author
    pub role: Role,
    /// Message content
    #[serde(default)]
    pub content: String,
    /// Optional participant name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tool calls made by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// ID of the tool call this message is a response to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Plain text message with the given role
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// A tool/function call requested by the assistant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Name of the function to call
    pub function: FunctionCall,
}

/// Function name and arguments within a tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// JSON-encoded arguments
    pub arguments: String,
}

/// Check the tool-call linkage invariant across a conversation
///
/// Every tool message must carry a `tool_call_id` referencing a tool
/// call made by a preceding assistant message. A violation is a client
/// error, never silently repaired.
pub fn validate_message_sequence(messages: &[Message]) -> Result<(), LlmError> {
    let mut seen_call_ids: HashSet<&str> = HashSet::new();

    for message in messages {
        match message.role {
            Role::Assistant => {
                for call in message.tool_calls.iter().flatten() {
                    seen_call_ids.insert(call.id.as_str());
                }
            }
            Role::Tool => {
                let id = message
                    .tool_call_id
                    .as_deref()
                    .ok_or_else(|| LlmError::InvalidRequest("tool message is missing tool_call_id".to_owned()))?;
                if !seen_call_ids.contains(id) {
                    return Err(LlmError::InvalidRequest(format!(
                        "tool message references unknown tool call '{id}'"
                    )));
                }
            }
            Role::System | Role::User => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant_with_call(id: &str) -> Message {
        Message {
            role: Role::Assistant,
            content: String::new(),
            name: None,
            tool_calls: Some(vec![ToolCall {
                id: id.to_owned(),
                function: FunctionCall {
                    name: "greet".to_owned(),
                    arguments: "{}".to_owned(),
                },
            }]),
            tool_call_id: None,
        }
    }

    fn tool_reply(id: Option<&str>) -> Message {
        Message {
            role: Role::Tool,
            content: "done".to_owned(),
            name: None,
            tool_calls: None,
            tool_call_id: id.map(str::to_owned),
        }
    }

    #[test]
    fn linked_tool_message_passes() {
        let messages = [assistant_with_call("call_1"), tool_reply(Some("call_1"))];
        assert!(validate_message_sequence(&messages).is_ok());
    }

    #[test]
    fn tool_message_without_id_is_rejected() {
        let messages = [assistant_with_call("call_1"), tool_reply(None)];
        assert!(matches!(
            validate_message_sequence(&messages),
            Err(LlmError::InvalidRequest(_))
        ));
    }

    #[test]
    fn tool_message_referencing_unknown_call_is_rejected() {
        let messages = [assistant_with_call("call_1"), tool_reply(Some("call_2"))];
        assert!(matches!(
            validate_message_sequence(&messages),
            Err(LlmError::InvalidRequest(_))
        ));
    }

    #[test]
    fn tool_message_before_its_call_is_rejected() {
        let messages = [tool_reply(Some("call_1")), assistant_with_call("call_1")];
        assert!(validate_message_sequence(&messages).is_err());
    }
}
