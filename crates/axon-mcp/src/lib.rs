//! Tool server federation for Axon
//!
//! Connects to independently-configured external MCP tool servers,
//! discovers their tool catalogues, and releases every connection
//! deterministically at the end of a request. One misbehaving server
//! degrades capability, never availability.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod client;
pub mod connection;
pub mod error;
pub mod oauth;

pub use client::ToolServerClient;
pub use connection::ServerConnection;
pub use error::McpError;
