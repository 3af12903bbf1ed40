//! End-to-end routing scenarios over the public API
//!
//! Backends and tools are stubbed; tool server behavior is exercised
//! against unreachable endpoints, which is the one failure mode that
//! needs no live server.

use std::sync::Arc;

use async_trait::async_trait;
use axon_config::{AiConfig, IntegrationCredentials, ProviderKind, ToolServerSet};
use axon_core::{HttpError, LogLevel, MemoryLogger, SharedLogger, Tool, ToolSource};
use axon_llm::types::{FinishReason, FunctionCall, ResponseMessage, ToolCall, Usage};
use axon_llm::{ChatBackend, ChatRequest, ChatResponse, Dispatcher, LlmError};
use axon_mcp::McpError;
use axon_mcp::oauth::OAUTH_TOKENS_HEADER;
use axon_router::{RouteError, RouteOutcome, RouteRequest, Router};
use axon_tools::{ToolError, ToolRegistry};
use http::{HeaderMap, HeaderValue};
use indexmap::IndexMap;
use serde_json::Value;

/// Backend stub that always answers by calling the `greet` tool
struct GreetBackend;

#[async_trait]
impl ChatBackend for GreetBackend {
    fn name(&self) -> &str {
        "stub"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Openai
    }

    async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        Ok(ChatResponse {
            id: "stub-1".to_owned(),
            model: "stub-model".to_owned(),
            message: ResponseMessage {
                role: "assistant".to_owned(),
                content: None,
                tool_calls: Some(vec![ToolCall {
                    id: "call_1".to_owned(),
                    function: FunctionCall {
                        name: "greet".to_owned(),
                        arguments: r#"{"who":"world"}"#.to_owned(),
                    },
                }]),
            },
            finish_reason: FinishReason::ToolCalls,
            usage: Usage {
                prompt_tokens: 12,
                completion_tokens: 3,
                total_tokens: 15,
            },
        })
    }
}

/// Tool stub mimicking a server-discovered tool
struct ServerTool {
    name: &'static str,
    server: &'static str,
}

#[async_trait]
impl Tool for ServerTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "test tool"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({"type": "object", "properties": {"a": {"type": "number"}}})
    }

    fn source_id(&self) -> &str {
        self.server
    }

    fn source_type(&self) -> ToolSource {
        ToolSource::McpServer
    }

    async fn invoke(&self, input: Value) -> anyhow::Result<Value> {
        Ok(serde_json::json!({"tool": self.name, "input": input}))
    }
}

fn stub_config(name: &str) -> AiConfig {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "provider": "openai",
        "model": "stub-model"
    }))
    .expect("valid config")
}

fn router_with_stub_backend(logger: SharedLogger) -> Router {
    let configs = vec![stub_config("stub")];
    let mut backends: IndexMap<String, Arc<dyn ChatBackend>> = IndexMap::new();
    backends.insert("stub".to_owned(), Arc::new(GreetBackend));
    let dispatcher = Dispatcher::with_backends(backends, logger.clone());
    Router::with_dispatcher(configs, IntegrationCredentials::new(), dispatcher, logger)
}

fn unreachable_servers() -> ToolServerSet {
    serde_json::from_value(serde_json::json!({
        "servers": {
            "knowledge": {"type": {"transport": "sse", "url": "http://127.0.0.1:1/sse"}}
        },
        "timeout_secs": 2
    }))
    .expect("valid set")
}

fn chat_body() -> Value {
    serde_json::json!({
        "messages": [{"role": "user", "content": "please greet the world"}],
        "tools": [{"type": "function", "function": {"name": "greet"}}],
        "toolChoice": "required"
    })
}

#[tokio::test]
async fn execute_query_surfaces_the_backends_tool_call() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger);

    let outcome = router
        .route(RouteRequest {
            operation: "execute-query".to_owned(),
            body: Some(chat_body()),
            ..RouteRequest::default()
        })
        .await
        .expect("query succeeds");

    let RouteOutcome::Completion(response) = outcome else {
        panic!("expected a completion");
    };
    assert_eq!(response.finish_reason, FinishReason::ToolCalls);

    let calls = response.message.tool_calls.expect("tool calls present");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].function.name, "greet");
}

#[tokio::test]
async fn missing_configuration_falls_back_to_first_with_a_warning() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger.clone());

    let outcome = router
        .route(RouteRequest {
            operation: "execute-query".to_owned(),
            query: serde_json::from_value(serde_json::json!({"configName": "nonexistent"})).expect("valid query"),
            body: Some(chat_body()),
            ..RouteRequest::default()
        })
        .await;

    assert!(outcome.is_ok());
    assert!(logger.contains(LogLevel::Warn, "nonexistent"));
}

#[tokio::test]
async fn no_configured_backend_is_an_error() {
    let logger: SharedLogger = Arc::new(MemoryLogger::new());
    let dispatcher = Dispatcher::with_backends(IndexMap::new(), logger.clone());
    let router = Router::with_dispatcher(Vec::new(), IntegrationCredentials::new(), dispatcher, logger);

    let outcome = router
        .route(RouteRequest {
            operation: "execute-query".to_owned(),
            body: Some(chat_body()),
            ..RouteRequest::default()
        })
        .await;

    let error = outcome.expect_err("no backends configured");
    assert!(matches!(error, RouteError::NoBackends));
    assert_eq!(error.status_code().as_u16(), 422);
}

#[tokio::test]
async fn invoke_tool_with_unknown_name_is_not_found() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger);

    let outcome = router
        .route(RouteRequest {
            operation: "invoke-tool".to_owned(),
            query: serde_json::from_value(serde_json::json!({"toolName": "ghost"})).expect("valid query"),
            body: Some(serde_json::json!({})),
            ..RouteRequest::default()
        })
        .await;

    match outcome.expect_err("unknown tool") {
        RouteError::Tool(ToolError::NotFound { tool }) => assert_eq!(tool, "ghost"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn list_tools_is_empty_without_servers_or_credentials() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger);

    let outcome = router
        .route(RouteRequest {
            operation: "list-tools".to_owned(),
            ..RouteRequest::default()
        })
        .await
        .expect("list succeeds");

    let RouteOutcome::ToolDefinitions(definitions) = outcome else {
        panic!("expected tool definitions");
    };
    assert!(definitions.is_empty());
}

#[tokio::test]
async fn unknown_operation_names_operation_and_query_only() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger);

    let outcome = router
        .route(RouteRequest {
            operation: "drop-tables".to_owned(),
            tool_servers: Some(unreachable_servers()),
            ..RouteRequest::default()
        })
        .await;

    match outcome.expect_err("unknown operation") {
        RouteError::NoAction { operation, query } => {
            assert_eq!(operation, "drop-tables");
            assert!(query.contains("toolName"));
            assert!(!query.contains("127.0.0.1"));
        }
        other => panic!("expected NoAction, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_oauth_header_fails_before_any_connection() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger.clone());

    let mut headers = HeaderMap::new();
    headers.insert(OAUTH_TOKENS_HEADER, HeaderValue::from_static("not-json"));

    let outcome = router
        .route(RouteRequest {
            operation: "list-tools".to_owned(),
            tool_servers: Some(unreachable_servers()),
            headers,
            ..RouteRequest::default()
        })
        .await;

    let error = outcome.expect_err("malformed header");
    assert!(matches!(error, RouteError::Mcp(McpError::InvalidTokenHeader(_))));
    assert_eq!(error.status_code().as_u16(), 400);

    // no client was ever constructed, so nothing was closed
    assert!(!logger.contains(LogLevel::Debug, "closed"));
}

#[tokio::test]
async fn unreachable_server_degrades_list_tools_and_still_closes() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger.clone());

    let outcome = router
        .route(RouteRequest {
            operation: "list-tools".to_owned(),
            tool_servers: Some(unreachable_servers()),
            ..RouteRequest::default()
        })
        .await
        .expect("degraded, not fatal");

    let RouteOutcome::ToolDefinitions(definitions) = outcome else {
        panic!("expected tool definitions");
    };
    assert!(definitions.is_empty());

    // all failures were connection-class, so the aggregate is a warning
    assert!(logger.contains(LogLevel::Warn, "1/1 tool server(s) failed"));
    assert!(!logger.contains(LogLevel::Error, "tool server(s) failed"));

    // cleanup ran exactly once
    assert_eq!(logger.count(LogLevel::Debug, "closed 1 tool server connection(s)"), 1);
}

#[tokio::test]
async fn cleanup_runs_without_masking_the_primary_error() {
    let logger = Arc::new(MemoryLogger::new());
    let router = router_with_stub_backend(logger.clone());

    let outcome = router
        .route(RouteRequest {
            operation: "invoke-tool".to_owned(),
            query: serde_json::from_value(serde_json::json!({"toolName": "ghost"})).expect("valid query"),
            tool_servers: Some(unreachable_servers()),
            ..RouteRequest::default()
        })
        .await;

    // the caller observes the branch's own error, not a cleanup artifact
    assert!(matches!(
        outcome.expect_err("unknown tool"),
        RouteError::Tool(ToolError::NotFound { .. })
    ));

    // connections were still released exactly once
    assert_eq!(logger.count(LogLevel::Debug, "closed 1 tool server connection(s)"), 1);
}

#[tokio::test]
async fn slack_credentials_surface_integration_tools_through_list_tools() {
    let logger: SharedLogger = Arc::new(MemoryLogger::new());
    let mut credentials = IntegrationCredentials::new();
    credentials.insert("slack_api_token", secrecy::SecretString::from("xoxb-test"));

    let mut backends: IndexMap<String, Arc<dyn ChatBackend>> = IndexMap::new();
    backends.insert("stub".to_owned(), Arc::new(GreetBackend));
    let dispatcher = Dispatcher::with_backends(backends, logger.clone());
    let router = Router::with_dispatcher(vec![stub_config("stub")], credentials, dispatcher, logger);

    let outcome = router
        .route(RouteRequest {
            operation: "list-tools".to_owned(),
            ..RouteRequest::default()
        })
        .await
        .expect("list succeeds");

    let RouteOutcome::ToolDefinitions(definitions) = outcome else {
        panic!("expected tool definitions");
    };

    let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert!(names.contains(&"search_messages"));
    assert!(names.contains(&"list_channels"));
    assert!(definitions.iter().all(|d| d.source_id == "slack"));
    assert!(
        definitions
            .iter()
            .all(|d| serde_json::to_value(d).expect("serializable")["sourceType"] == "server")
    );
}

#[tokio::test]
async fn registry_reports_mcp_provenance_for_discovered_tools() {
    // two tools discovered from one server, no local integrations
    let registry = ToolRegistry::build(
        vec![],
        vec![
            Arc::new(ServerTool {
                name: "add",
                server: "calculator",
            }) as Arc<dyn Tool>,
            Arc::new(ServerTool {
                name: "multiply",
                server: "calculator",
            }),
        ],
    )
    .expect("no collision");

    let definitions = registry.frontend_definitions();
    assert_eq!(definitions.len(), 2);

    for definition in &definitions {
        assert_eq!(definition.source_id, "calculator");
        let json = serde_json::to_value(definition).expect("serializable");
        assert_eq!(json["sourceType"], "mcp-server");
    }

    let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["add", "multiply"]);
}

#[tokio::test]
async fn invoke_tool_reaches_a_discovered_tool_by_sanitized_name() {
    let registry = ToolRegistry::build(
        vec![],
        vec![Arc::new(ServerTool {
            name: "add numbers",
            server: "calculator",
        }) as Arc<dyn Tool>],
    )
    .expect("no collision");

    let output = registry
        .invoke("add_numbers", serde_json::json!({"a": 1}))
        .await
        .expect("tool runs");
    assert_eq!(output["tool"], "add numbers");
}
