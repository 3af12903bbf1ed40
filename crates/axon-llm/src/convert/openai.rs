//! Conversion between canonical types and the OpenAI wire format
//!
//! The canonical shape is OpenAI-shaped, so request translation is close
//! to 1:1; the work is validation and response normalization.

use crate::error::LlmError;
use crate::protocol::openai::{
    OpenAiContent, OpenAiFunction, OpenAiFunctionCall, OpenAiMessage, OpenAiRequest, OpenAiResponse, OpenAiTool,
    OpenAiToolCall,
};
use crate::types::{
    ChatRequest, ChatResponse, FinishReason, FunctionCall, Message, ResponseMessage, Role, ToolCall, ToolChoice,
    ToolChoiceMode, Usage,
};

use super::{decode_arguments, fallback_call_id};

/// Build an OpenAI wire request from a canonical request
pub fn request_to_openai(request: &ChatRequest, model: &str, max_tokens: Option<u32>) -> Result<OpenAiRequest, LlmError> {
    let messages = request
        .messages
        .iter()
        .map(message_to_openai)
        .collect::<Result<Vec<_>, _>>()?;

    let tools = request.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|t| OpenAiTool {
                tool_type: t.tool_type.clone(),
                function: OpenAiFunction {
                    name: t.function.name.clone(),
                    description: t.function.description.clone(),
                    parameters: t.function.parameters.clone(),
                },
            })
            .collect()
    });

    Ok(OpenAiRequest {
        model: model.to_owned(),
        messages,
        max_tokens,
        tools,
        tool_choice: request.tool_choice.as_ref().map(tool_choice_to_openai),
        parallel_tool_calls: request.parallel_tool_calls,
    })
}

fn message_to_openai(message: &Message) -> Result<OpenAiMessage, LlmError> {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    if message.role == Role::Tool && message.tool_call_id.is_none() {
        return Err(LlmError::InvalidRequest("tool message is missing tool_call_id".to_owned()));
    }

    let tool_calls = message
        .tool_calls
        .as_ref()
        .map(|calls| {
            calls
                .iter()
                .map(|call| {
                    decode_arguments(&call.function.name, &call.function.arguments)?;
                    Ok(OpenAiToolCall {
                        id: Some(call.id.clone()),
                        tool_type: "function".to_owned(),
                        function: OpenAiFunctionCall {
                            name: call.function.name.clone(),
                            arguments: call.function.arguments.clone(),
                        },
                    })
                })
                .collect::<Result<Vec<_>, LlmError>>()
        })
        .transpose()?;

    Ok(OpenAiMessage {
        role: role.to_owned(),
        content: Some(OpenAiContent::Text(message.content.clone())),
        name: message.name.clone(),
        tool_calls,
        tool_call_id: message.tool_call_id.clone(),
    })
}

/// Convert canonical tool choice to OpenAI's flexible JSON value
fn tool_choice_to_openai(choice: &ToolChoice) -> serde_json::Value {
    match choice {
        ToolChoice::Mode(mode) => {
            let s = match mode {
                ToolChoiceMode::None => "none",
                ToolChoiceMode::Auto => "auto",
                ToolChoiceMode::Required => "required",
            };
            serde_json::Value::String(s.to_owned())
        }
        ToolChoice::Function(func) => serde_json::json!({
            "type": func.tool_type,
            "function": { "name": func.function.name }
        }),
    }
}

/// Normalize an OpenAI wire response into the canonical response
pub fn response_to_chat(response: OpenAiResponse) -> Result<ChatResponse, LlmError> {
    let choice = response.choices.into_iter().next().ok_or_else(|| LlmError::Provider {
        provider: "openai".to_owned(),
        message: "response contained no choices".to_owned(),
    })?;

    let content = choice.message.content.as_ref().map(OpenAiContent::text);

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall {
            id: call.id.unwrap_or_else(fallback_call_id),
            function: FunctionCall {
                name: call.function.name,
                arguments: call.function.arguments,
            },
        })
        .collect();

    let finish_reason = if tool_calls.is_empty() {
        FinishReason::Stop
    } else {
        FinishReason::ToolCalls
    };

    let usage = response.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(ChatResponse {
        id: response.id,
        model: response.model,
        message: ResponseMessage {
            role: "assistant".to_owned(),
            content,
            tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
        },
        finish_reason,
        usage: usage.unwrap_or_default(),
    })
}
