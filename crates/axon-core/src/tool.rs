//! Tool capability trait
//!
//! One trait covers every tool reachable through the routing layer,
//! whether statically configured (a local integration) or discovered from
//! a connected tool server. Origin is carried as metadata, not behavior.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Where a tool came from, for frontend attribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolSource {
    /// Statically configured local integration
    Server,
    /// Discovered from a connected MCP tool server
    McpServer,
}

/// A tool the model (or a caller) can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Natural tool name as the source declares it
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input
    fn input_schema(&self) -> Value;

    /// Identifier of the server or integration that produced this tool
    fn source_id(&self) -> &str;

    /// Provenance tag
    fn source_type(&self) -> ToolSource;

    /// Execute the tool with an opaque JSON input
    async fn invoke(&self, input: Value) -> anyhow::Result<Value>;

    /// Name safe for use as an LLM function-call identifier
    fn sanitized_name(&self) -> String {
        sanitize_tool_name(self.name())
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`
///
/// LLM function-call identifiers reject spaces and most punctuation; the
/// sanitized form is the addressable name for lookup and invocation.
pub fn sanitize_tool_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_allowed_characters() {
        assert_eq!(sanitize_tool_name("search_messages-v2"), "search_messages-v2");
    }

    #[test]
    fn sanitize_replaces_spaces_and_punctuation() {
        assert_eq!(sanitize_tool_name("Search Messages!"), "Search_Messages_");
        assert_eq!(sanitize_tool_name("a.b/c"), "a_b_c");
    }

    #[test]
    fn sanitize_replaces_non_ascii() {
        assert_eq!(sanitize_tool_name("héllo"), "h_llo");
    }
}
