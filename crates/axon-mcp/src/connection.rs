use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use axon_config::{HttpTransport, StdioTransport, ToolServerConfig, ToolServerTransport};
use indexmap::IndexMap;
use rmcp::model::{CallToolRequestParam, CallToolResult, Tool as McpTool};
use rmcp::service::{RoleClient, RunningService, ServiceExt as _};
use rmcp::transport::TokioChildProcess;
use tokio::sync::Mutex;

use crate::error::McpError;

/// One independent connection to a configured tool server
///
/// Each server gets its own `ServerConnection`; a misbehaving or slow
/// server must not block or corrupt another server's connection. The
/// handle is shared between discovered tools (which invoke through it)
/// and the owning client (which retains the right to close it).
pub struct ServerConnection {
    name: String,
    config: ToolServerConfig,
    timeout: Option<Duration>,
    service: Mutex<Option<RunningService<RoleClient, ()>>>,
}

impl ServerConnection {
    pub(crate) fn new(name: String, config: ToolServerConfig, timeout: Option<Duration>) -> Self {
        Self {
            name,
            config,
            timeout,
            service: Mutex::new(None),
        }
    }

    /// Server name this connection belongs to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open the connection if it is not open yet
    pub async fn connect(&self) -> Result<(), McpError> {
        let mut guard = self.service.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let service = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.open())
                .await
                .map_err(|_| McpError::Unreachable {
                    server: self.name.clone(),
                    message: format!("timed out after {}s", limit.as_secs()),
                })??,
            None => self.open().await?,
        };

        *guard = Some(service);
        Ok(())
    }

    async fn open(&self) -> Result<RunningService<RoleClient, ()>, McpError> {
        match &self.config.transport {
            ToolServerTransport::Stdio(config) => self.open_stdio(config).await,
            ToolServerTransport::Sse(config) => self.open_sse(config).await,
            ToolServerTransport::StreamableHttp(config) => self.open_streamable_http(config).await,
        }
    }

    async fn open_stdio(&self, config: &StdioTransport) -> Result<RunningService<RoleClient, ()>, McpError> {
        let mut cmd = tokio::process::Command::new(&config.command);
        cmd.args(&config.args);
        for (k, v) in &config.env {
            cmd.env(k, v);
        }

        // Spawn failure is the stdio analogue of "nothing listening"
        let transport = TokioChildProcess::new(cmd).map_err(|e| McpError::Unreachable {
            server: self.name.clone(),
            message: format!("failed to spawn process: {e}"),
        })?;

        ().serve(transport).await.map_err(|e| McpError::Protocol {
            server: self.name.clone(),
            message: format!("stdio handshake failed: {e}"),
        })
    }

    async fn open_sse(&self, config: &HttpTransport) -> Result<RunningService<RoleClient, ()>, McpError> {
        use rmcp::transport::SseClientTransport;
        use rmcp::transport::sse_client::SseClientConfig;

        let sse_config = SseClientConfig {
            sse_endpoint: Arc::from(config.url.as_str()),
            ..Default::default()
        };

        let client = build_http_client(&self.name, &config.headers)?;

        // The SSE transport connects eagerly, so a failure here is a
        // connection-class condition
        let transport = SseClientTransport::start_with_client(client, sse_config)
            .await
            .map_err(|e| McpError::Unreachable {
                server: self.name.clone(),
                message: format!("SSE connection failed: {e}"),
            })?;

        ().serve(transport).await.map_err(|e| McpError::Protocol {
            server: self.name.clone(),
            message: format!("SSE handshake failed: {e}"),
        })
    }

    async fn open_streamable_http(&self, config: &HttpTransport) -> Result<RunningService<RoleClient, ()>, McpError> {
        use rmcp::transport::StreamableHttpClientTransport;
        use rmcp::transport::streamable_http_client::StreamableHttpClientTransportConfig;

        let transport_config = StreamableHttpClientTransportConfig::with_uri(config.url.as_str());
        let client = build_http_client(&self.name, &config.headers)?;
        let transport = StreamableHttpClientTransport::with_client(client, transport_config);

        // The streamable transport connects lazily: the TCP connect only
        // happens inside the handshake, so its failures must be classified
        // by cause rather than by phase
        ().serve(transport)
            .await
            .map_err(|e| classify_handshake_error(&self.name, format!("streamable HTTP handshake failed: {e}")))
    }

    /// List all tools available on this server
    pub async fn list_tools(&self) -> Result<Vec<McpTool>, McpError> {
        let guard = self.service.lock().await;
        let service = guard.as_ref().ok_or_else(|| McpError::Closed {
            server: self.name.clone(),
        })?;

        service.list_all_tools().await.map_err(|e| McpError::Protocol {
            server: self.name.clone(),
            message: format!("tool discovery failed: {e}"),
        })
    }

    /// Call a tool on this server
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, McpError> {
        let guard = self.service.lock().await;
        let service = guard.as_ref().ok_or_else(|| McpError::Closed {
            server: self.name.clone(),
        })?;

        service
            .call_tool(CallToolRequestParam {
                name: Cow::Owned(name.to_owned()),
                arguments,
            })
            .await
            .map_err(|e| McpError::Protocol {
                server: self.name.clone(),
                message: format!("tool '{name}' failed: {e}"),
            })
    }

    /// Release the connection; a no-op if it was never opened
    pub async fn close(&self) -> Result<(), McpError> {
        let service = self.service.lock().await.take();
        if let Some(service) = service {
            service.cancel().await.map_err(|e| McpError::Protocol {
                server: self.name.clone(),
                message: format!("shutdown failed: {e}"),
            })?;
        }
        Ok(())
    }
}

/// Build a reqwest client carrying this server's configured headers
fn build_http_client(server: &str, headers: &IndexMap<String, String>) -> Result<reqwest::Client, McpError> {
    let mut map = reqwest::header::HeaderMap::new();
    for (name, value) in headers {
        let name = reqwest::header::HeaderName::try_from(name.as_str()).map_err(|e| McpError::InvalidConfig {
            server: server.to_owned(),
            message: format!("invalid header name '{name}': {e}"),
        })?;
        let value = reqwest::header::HeaderValue::from_str(value).map_err(|e| McpError::InvalidConfig {
            server: server.to_owned(),
            message: format!("invalid value for header '{name:?}': {e}"),
        })?;
        map.insert(name, value);
    }

    reqwest::Client::builder()
        .default_headers(map)
        .build()
        .map_err(|e| McpError::Protocol {
            server: server.to_owned(),
            message: format!("failed to build HTTP client: {e}"),
        })
}

/// Decide whether a handshake failure means "nothing listening" or
/// "listening but broken"
fn classify_handshake_error(server: &str, message: String) -> McpError {
    const CONNECTION_MARKERS: &[&str] = &[
        "connection refused",
        "connection reset",
        "failed to connect",
        "dns error",
        "failed to lookup",
        "timed out",
        "network unreachable",
        "host unreachable",
    ];

    let lowered = message.to_ascii_lowercase();
    if CONNECTION_MARKERS.iter().any(|marker| lowered.contains(marker)) {
        McpError::Unreachable {
            server: server.to_owned(),
            message,
        }
    } else {
        McpError::Protocol {
            server: server.to_owned(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_errors_classify_by_cause() {
        let unreachable = classify_handshake_error("calc", "tcp connect error: Connection refused (os error 111)".into());
        assert!(unreachable.is_connection());

        let broken = classify_handshake_error("calc", "unexpected initialize response".into());
        assert!(!broken.is_connection());
    }

    #[tokio::test]
    async fn close_without_connect_is_a_noop() {
        let config: ToolServerConfig = serde_json::from_value(serde_json::json!({
            "type": {"transport": "stdio", "command": "does-not-exist"}
        }))
        .expect("valid config");

        let connection = ServerConnection::new("calc".into(), config, None);
        assert!(connection.close().await.is_ok());
    }

    #[tokio::test]
    async fn call_on_closed_connection_errors() {
        let config: ToolServerConfig = serde_json::from_value(serde_json::json!({
            "type": {"transport": "stdio", "command": "does-not-exist"}
        }))
        .expect("valid config");

        let connection = ServerConnection::new("calc".into(), config, None);
        let result = connection.call_tool("add", None).await;
        assert!(matches!(result, Err(McpError::Closed { .. })));
    }
}
