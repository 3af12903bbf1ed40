//! Shared kernel for the Axon routing layer
//!
//! Holds the pieces every other crate needs: the HTTP severity-mapping
//! trait for domain errors, the injected logger capability, and the
//! tool capability trait with its provenance tag.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod logging;
pub mod tool;

pub use error::HttpError;
pub use logging::{LogLevel, Logger, MemoryLogger, NoopLogger, SharedLogger, TracingLogger};
pub use tool::{Tool, ToolSource, sanitize_tool_name};
