use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

/// Named set of external tool server configurations
///
/// Always handled as a whole per request: the set is supplied on each
/// top-level call and every server in it gets its own independent
/// connection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolServerSet {
    /// Tool server configurations keyed by name
    #[serde(default)]
    pub servers: IndexMap<String, ToolServerConfig>,
    /// Optional bound on each server's connect and discovery calls,
    /// in seconds. Absent means the transport's own timeouts apply.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ToolServerSet {
    /// Timeout as a [`Duration`], if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

/// Configuration for a single tool server
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolServerConfig {
    /// Server transport
    #[serde(rename = "type")]
    pub transport: ToolServerTransport,
    /// Arbitrary provider-specific options passed through unchanged
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// Tool server transport types
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum ToolServerTransport {
    /// Local subprocess speaking MCP over stdio
    Stdio(StdioTransport),
    /// HTTP with SSE
    Sse(HttpTransport),
    /// HTTP with the streamable protocol
    StreamableHttp(HttpTransport),
}

impl ToolServerTransport {
    /// Whether this transport carries HTTP headers
    pub const fn is_http(&self) -> bool {
        matches!(self, Self::Sse(_) | Self::StreamableHttp(_))
    }
}

/// Stdio transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StdioTransport {
    /// Command to execute
    pub command: String,
    /// Command arguments
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpTransport {
    /// Server URL
    pub url: Url,
    /// Headers sent on every request to this server
    #[serde(default)]
    pub headers: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_stdio_and_http_servers() {
        let set: ToolServerSet = serde_json::from_value(serde_json::json!({
            "servers": {
                "calculator": {
                    "type": {"transport": "stdio", "command": "calc-mcp", "args": ["--strict"]}
                },
                "knowledge": {
                    "type": {
                        "transport": "sse",
                        "url": "https://tools.internal/sse",
                        "headers": {"x-team": "platform"}
                    }
                }
            },
            "timeout_secs": 10
        }))
        .expect("valid set");

        assert_eq!(set.servers.len(), 2);
        assert_eq!(set.timeout(), Some(Duration::from_secs(10)));
        assert!(!set.servers["calculator"].transport.is_http());
        assert!(set.servers["knowledge"].transport.is_http());
    }

    #[test]
    fn preserves_server_order() {
        let set: ToolServerSet = serde_json::from_value(serde_json::json!({
            "servers": {
                "b": {"type": {"transport": "stdio", "command": "b"}},
                "a": {"type": {"transport": "stdio", "command": "a"}}
            }
        }))
        .expect("valid set");

        let names: Vec<_> = set.servers.keys().cloned().collect();
        assert_eq!(names, ["b", "a"]);
    }
}
