//! Canonical message, tool, request, and response types
//!
//! The single internal representation every provider adapter translates
//! to and from.

mod message;
mod request;
mod response;
mod tool;

pub use message::{FunctionCall, Message, Role, ToolCall, validate_message_sequence};
pub use request::ChatRequest;
pub use response::{ChatResponse, FinishReason, ResponseMessage, Usage};
pub use tool::{FunctionDefinition, ToolChoice, ToolChoiceFunction, ToolChoiceFunctionName, ToolChoiceMode, ToolDefinition};
