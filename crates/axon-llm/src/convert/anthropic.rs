//! Conversion between canonical types and the Anthropic wire format
//!
//! The Messages API differs from the canonical shape in two ways this
//! module isolates: it accepts at most one leading system prompt, and
//! its "disable parallel tool calls" flag exists only on the object form
//! of the tool choice.

use crate::error::LlmError;
use crate::protocol::anthropic::{
    AnthropicContent, AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse,
    AnthropicResponseBlock, AnthropicTool, AnthropicToolChoice,
};
use crate::types::{
    ChatRequest, ChatResponse, FinishReason, FunctionCall, Message, ResponseMessage, Role, ToolCall, ToolChoice,
    ToolChoiceMode, Usage,
};

use super::{decode_arguments, fallback_call_id};

/// Build an Anthropic wire request from a canonical request
///
/// All canonical system messages are merged, in order, into the single
/// leading `system` field with a blank-line separator.
pub fn request_to_anthropic(request: &ChatRequest, model: &str, max_tokens: u32) -> Result<AnthropicRequest, LlmError> {
    let mut system_parts: Vec<&str> = Vec::new();
    let mut messages = Vec::new();

    for message in &request.messages {
        match message.role {
            Role::System => system_parts.push(&message.content),
            _ => messages.push(message_to_anthropic(message)?),
        }
    }

    let system = if system_parts.is_empty() {
        None
    } else {
        Some(system_parts.join("\n\n"))
    };

    let tools = request.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|t| AnthropicTool {
                name: t.function.name.clone(),
                description: t.function.description.clone(),
                input_schema: t
                    .function
                    .parameters
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({"type": "object"})),
            })
            .collect()
    });

    Ok(AnthropicRequest {
        model: model.to_owned(),
        max_tokens,
        system,
        messages,
        tools,
        tool_choice: tool_choice_to_anthropic(request.tool_choice.as_ref(), request.parallel_tool_calls),
    })
}

fn message_to_anthropic(message: &Message) -> Result<AnthropicMessage, LlmError> {
    // Tool results travel as user messages carrying a tool_result block
    if message.role == Role::Tool {
        let tool_call_id = message
            .tool_call_id
            .as_ref()
            .ok_or_else(|| LlmError::InvalidRequest("tool message is missing tool_call_id".to_owned()))?;

        return Ok(AnthropicMessage {
            role: "user".to_owned(),
            content: AnthropicContent::Blocks(vec![AnthropicContentBlock::ToolResult {
                tool_use_id: tool_call_id.clone(),
                content: Some(message.content.clone()),
                is_error: None,
            }]),
        });
    }

    // Assistant tool calls become tool_use blocks with decoded arguments
    if let Some(tool_calls) = &message.tool_calls {
        let mut blocks: Vec<AnthropicContentBlock> = Vec::new();

        if !message.content.is_empty() {
            blocks.push(AnthropicContentBlock::Text {
                text: message.content.clone(),
            });
        }

        for call in tool_calls {
            let input = decode_arguments(&call.function.name, &call.function.arguments)?;
            blocks.push(AnthropicContentBlock::ToolUse {
                id: call.id.clone(),
                name: call.function.name.clone(),
                input,
            });
        }

        return Ok(AnthropicMessage {
            role: "assistant".to_owned(),
            content: AnthropicContent::Blocks(blocks),
        });
    }

    let role = match message.role {
        Role::Assistant => "assistant",
        _ => "user",
    };

    Ok(AnthropicMessage {
        role: role.to_owned(),
        content: AnthropicContent::Text(message.content.clone()),
    })
}

/// Convert canonical tool choice to the Anthropic shape
///
/// When the caller disabled parallel tool calls, the bare `auto`/`any`
/// sentinels are upgraded to object form carrying the flag. `none` passes
/// through unchanged: not calling tools and not calling them in parallel
/// are orthogonal.
fn tool_choice_to_anthropic(choice: Option<&ToolChoice>, parallel_tool_calls: Option<bool>) -> Option<AnthropicToolChoice> {
    let disable_parallel = parallel_tool_calls == Some(false);
    let flag = disable_parallel.then_some(true);

    match choice {
        None => {
            // No explicit choice means "auto"; it only needs spelling out
            // when the parallelism flag has to ride on it
            disable_parallel.then(|| AnthropicToolChoice {
                choice_type: "auto".to_owned(),
                name: None,
                disable_parallel_tool_use: Some(true),
            })
        }
        Some(ToolChoice::Mode(ToolChoiceMode::None)) => Some(AnthropicToolChoice {
            choice_type: "none".to_owned(),
            name: None,
            disable_parallel_tool_use: None,
        }),
        Some(ToolChoice::Mode(ToolChoiceMode::Auto)) => Some(AnthropicToolChoice {
            choice_type: "auto".to_owned(),
            name: None,
            disable_parallel_tool_use: flag,
        }),
        Some(ToolChoice::Mode(ToolChoiceMode::Required)) => Some(AnthropicToolChoice {
            choice_type: "any".to_owned(),
            name: None,
            disable_parallel_tool_use: flag,
        }),
        Some(ToolChoice::Function(func)) => Some(AnthropicToolChoice {
            choice_type: "tool".to_owned(),
            name: Some(func.function.name.clone()),
            disable_parallel_tool_use: flag,
        }),
    }
}

/// Normalize an Anthropic wire response into the canonical response
pub fn response_to_chat(response: AnthropicResponse) -> ChatResponse {
    let mut text = String::new();
    let mut tool_calls: Vec<ToolCall> = Vec::new();

    for block in response.content {
        match block {
            AnthropicResponseBlock::Text { text: t } => text.push_str(&t),
            AnthropicResponseBlock::ToolUse { id, name, input } => {
                let arguments = serde_json::to_string(&input).unwrap_or_else(|_| "{}".to_owned());
                tool_calls.push(ToolCall {
                    id: id.unwrap_or_else(fallback_call_id),
                    function: FunctionCall { name, arguments },
                });
            }
            AnthropicResponseBlock::Other => {}
        }
    }

    let finish_reason = if tool_calls.is_empty() {
        FinishReason::Stop
    } else {
        FinishReason::ToolCalls
    };

    let usage = response.usage.map(|u| Usage {
        prompt_tokens: u.input_tokens,
        completion_tokens: u.output_tokens,
        total_tokens: u.input_tokens + u.output_tokens,
    });

    ChatResponse {
        id: response.id,
        model: response.model,
        message: ResponseMessage {
            role: "assistant".to_owned(),
            content: if text.is_empty() && !tool_calls.is_empty() {
                None
            } else {
                Some(text)
            },
            tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
        },
        finish_reason,
        usage: usage.unwrap_or_default(),
    }
}
