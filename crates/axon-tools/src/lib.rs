//! Remote tool registry for Axon
//!
//! Presents one uniform, addressable catalogue of tools to both the
//! LLM-facing dispatcher and the frontend, regardless of tool origin:
//! statically configured local integrations and tools discovered from
//! connected servers all satisfy the same contract.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod integrations;
pub mod registry;

pub use error::ToolError;
pub use registry::{FrontendToolDefinition, ToolRegistry};
