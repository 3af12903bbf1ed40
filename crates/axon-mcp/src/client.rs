use std::sync::Arc;

use async_trait::async_trait;
use axon_config::ToolServerSet;
use axon_core::{SharedLogger, Tool, ToolSource};
use futures_util::future::join_all;
use rmcp::model::{CallToolResult, RawContent, Tool as McpTool};
use serde_json::Value;

use crate::connection::ServerConnection;
use crate::error::McpError;

/// Request-scoped client over a set of tool servers
///
/// Lives exactly as long as one top-level routing invocation: construct,
/// load, use, close. Every server gets its own [`ServerConnection`] so
/// failures stay attributed to their own server.
pub struct ToolServerClient {
    connections: Vec<Arc<ServerConnection>>,
    logger: SharedLogger,
}

impl ToolServerClient {
    /// Create one sub-client per configured server without connecting yet
    pub fn new(set: ToolServerSet, logger: SharedLogger) -> Self {
        let timeout = set.timeout();
        let connections = set
            .servers
            .into_iter()
            .map(|(name, config)| Arc::new(ServerConnection::new(name, config, timeout)))
            .collect();

        Self { connections, logger }
    }

    /// Number of configured servers
    pub fn server_count(&self) -> usize {
        self.connections.len()
    }

    /// Discover tools from every configured server concurrently
    ///
    /// Each server's failure is caught at its own boundary and recorded;
    /// the other servers' results are unaffected. Failures are aggregated
    /// into a single summary whose severity is a warning when every
    /// failure was a connection-class condition ("nothing listening") and
    /// an error otherwise ("listening but broken"). Never fails for
    /// per-server failures; returns whatever tools were recovered.
    pub async fn load_tools(&self) -> Vec<Arc<dyn Tool>> {
        let handles: Vec<_> = self
            .connections
            .iter()
            .map(|conn| {
                let conn = Arc::clone(conn);
                tokio::spawn(async move {
                    conn.connect().await?;
                    let tools = conn.list_tools().await?;
                    Ok::<_, McpError>(tools)
                })
            })
            .collect();

        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();
        let mut failures: Vec<McpError> = Vec::new();

        for (conn, outcome) in self.connections.iter().zip(join_all(handles).await) {
            match outcome {
                Ok(Ok(server_tools)) => {
                    for tool in server_tools {
                        tools.push(Arc::new(DiscoveredTool::from_catalogue(Arc::clone(conn), tool)));
                    }
                }
                Ok(Err(e)) => failures.push(e),
                Err(e) => failures.push(McpError::Protocol {
                    server: conn.name().to_owned(),
                    message: format!("discovery task failed: {e}"),
                }),
            }
        }

        if !failures.is_empty() {
            let details: Vec<String> = failures.iter().map(ToString::to_string).collect();
            let summary = format!(
                "{}/{} tool server(s) failed: {}",
                failures.len(),
                self.connections.len(),
                details.join("; ")
            );
            if failures.iter().all(McpError::is_connection) {
                self.logger.warn(&summary);
            } else {
                self.logger.error(&summary);
            }
        }

        self.logger.debug(&format!(
            "discovered {} tool(s) from {} tool server(s)",
            tools.len(),
            self.connections.len()
        ));

        tools
    }

    /// Validate that every configured server is reachable
    ///
    /// Opens connections and always cleans them up again, whatever the
    /// outcome; a cleanup failure never replaces the connect error.
    pub async fn test_connections(&self) -> Result<(), McpError> {
        let result = self.connect_all().await;
        self.close_connections().await;
        result
    }

    async fn connect_all(&self) -> Result<(), McpError> {
        let handles: Vec<_> = self
            .connections
            .iter()
            .map(|conn| {
                let conn = Arc::clone(conn);
                tokio::spawn(async move { conn.connect().await })
            })
            .collect();

        let mut first_error = None;
        for (conn, outcome) in self.connections.iter().zip(join_all(handles).await) {
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(e) => McpError::Protocol {
                    server: conn.name().to_owned(),
                    message: format!("connect task failed: {e}"),
                },
            };
            if first_error.is_none() {
                first_error = Some(failure);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Close every connection independently, waiting for all outcomes
    ///
    /// One server's slow or failed shutdown never prevents the others
    /// from shutting down. Failures are logged, never returned: failing
    /// to close is a resource-leak risk, not a correctness risk for the
    /// caller.
    pub async fn close_connections(&self) {
        let handles: Vec<_> = self
            .connections
            .iter()
            .map(|conn| {
                let conn = Arc::clone(conn);
                tokio::spawn(async move { conn.close().await })
            })
            .collect();

        for (conn, outcome) in self.connections.iter().zip(join_all(handles).await) {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => self.logger.warn(&format!("failed to close tool server connection: {e}")),
                Err(e) => self
                    .logger
                    .warn(&format!("close task for tool server {} failed: {e}", conn.name())),
            }
        }

        self.logger
            .debug(&format!("closed {} tool server connection(s)", self.connections.len()));
    }
}

/// Tool discovered from a connected server
///
/// Carries its originating server as provenance and invokes through the
/// shared connection handle.
pub struct DiscoveredTool {
    connection: Arc<ServerConnection>,
    name: String,
    description: String,
    schema: Value,
}

impl DiscoveredTool {
    fn from_catalogue(connection: Arc<ServerConnection>, tool: McpTool) -> Self {
        let schema = serde_json::to_value(&*tool.input_schema).unwrap_or_default();
        Self {
            connection,
            name: tool.name.to_string(),
            description: tool.description.as_deref().unwrap_or("").to_owned(),
            schema,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(connection: Arc<ServerConnection>, name: &str, schema: Value) -> Self {
        Self {
            connection,
            name: name.to_owned(),
            description: String::new(),
            schema,
        }
    }
}

#[async_trait]
impl Tool for DiscoveredTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        self.schema.clone()
    }

    fn source_id(&self) -> &str {
        self.connection.name()
    }

    fn source_type(&self) -> ToolSource {
        ToolSource::McpServer
    }

    async fn invoke(&self, input: Value) -> anyhow::Result<Value> {
        let arguments = match input {
            Value::Object(map) => Some(map),
            Value::Null => None,
            _ => anyhow::bail!("tool input must be a JSON object"),
        };

        let result = self.connection.call_tool(&self.name, arguments).await?;
        tool_result_to_value(result)
    }
}

/// Convert a tool call result into the opaque output callers receive
///
/// Error results become invocation failures carrying the server's own
/// message instead of a success payload with an error flag buried in it.
fn tool_result_to_value(result: CallToolResult) -> anyhow::Result<Value> {
    if result.is_error == Some(true) {
        let message = text_content(&result);
        if message.is_empty() {
            anyhow::bail!("tool reported an error");
        }
        anyhow::bail!("{message}");
    }

    serde_json::to_value(&result).map_err(|e| anyhow::anyhow!("unserializable tool result: {e}"))
}

fn text_content(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
