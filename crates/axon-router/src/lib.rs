//! Top-level request router for Axon
//!
//! Owns the lifecycle of a per-invocation tool server client
//! (construct → load → use → close, always), selects the named AI
//! configuration, and dispatches to one of three operations:
//! `execute-query`, `invoke-tool`, or `list-tools`.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod request;
pub mod router;

pub use error::RouteError;
pub use request::{RouteQuery, RouteRequest};
pub use router::{RouteOutcome, Router};
