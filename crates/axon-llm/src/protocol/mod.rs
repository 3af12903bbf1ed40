//! Provider wire formats
//!
//! Dedicated serde structs per provider; request bodies are never built
//! from ad-hoc JSON.

pub mod anthropic;
pub mod openai;
