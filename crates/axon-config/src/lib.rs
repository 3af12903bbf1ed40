//! Configuration types for the Axon routing layer
//!
//! AI backend configurations, tool server sets, and integration
//! credentials. Everything here is plain data: supplied fresh on every
//! top-level call for tool servers, immutable after construction for AI
//! backends.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod ai;
pub mod credentials;
pub mod loader;
pub mod tool_server;

pub use ai::{AiConfig, AiCredentials, ProviderKind};
pub use credentials::IntegrationCredentials;
pub use loader::AxonConfig;
pub use tool_server::{HttpTransport, StdioTransport, ToolServerConfig, ToolServerSet, ToolServerTransport};
