//! LLM provider dispatch for Axon
//!
//! Translates the canonical chat/tool request shape to each configured
//! provider's native wire format, invokes the backend, and normalizes
//! the response back to the single canonical shape.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod convert;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod types;

pub use dispatch::Dispatcher;
pub use error::LlmError;
pub use provider::ChatBackend;
pub use types::{ChatRequest, ChatResponse, FinishReason, Message, Role, ToolChoice, ToolDefinition, Usage};
