//! Provider dispatcher
//!
//! Executes one canonical chat/tool request against exactly one
//! configured backend. Backends are built once from the configuration
//! list; the per-call work is schema restoration, the backend call, and
//! response normalization (inside the backend).

use std::sync::Arc;

use axon_config::{AiConfig, ProviderKind};
use axon_core::SharedLogger;
use axon_tools::ToolRegistry;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::LlmError;
use crate::provider::anthropic::AnthropicBackend;
use crate::provider::mistral::MistralBackend;
use crate::provider::openai::OpenAiBackend;
use crate::provider::ChatBackend;
use crate::types::{ChatRequest, ChatResponse};

/// Name-addressed collection of configured backends
pub struct Dispatcher {
    backends: IndexMap<String, Arc<dyn ChatBackend>>,
    logger: SharedLogger,
}

impl Dispatcher {
    /// Build one backend per AI configuration
    ///
    /// Provider selection happens here, once, from the closed provider
    /// union; calls look backends up by configuration name.
    pub fn new(configs: &[AiConfig], logger: SharedLogger) -> Self {
        let mut backends: IndexMap<String, Arc<dyn ChatBackend>> = IndexMap::with_capacity(configs.len());

        for config in configs {
            let backend: Arc<dyn ChatBackend> = match config.provider {
                ProviderKind::Openai => Arc::new(OpenAiBackend::new(config)),
                ProviderKind::Anthropic => Arc::new(AnthropicBackend::new(config)),
                ProviderKind::Mistral => Arc::new(MistralBackend::new(config)),
            };
            backends.insert(config.name.clone(), backend);
        }

        Self { backends, logger }
    }

    /// Build from pre-constructed backends
    ///
    /// Lets embedding hosts and tests supply their own [`ChatBackend`]
    /// implementations.
    pub fn with_backends(backends: IndexMap<String, Arc<dyn ChatBackend>>, logger: SharedLogger) -> Self {
        Self { backends, logger }
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.backends.contains_key(name)
    }

    /// Execute a canonical request against the named backend
    pub async fn execute(
        &self,
        config_name: &str,
        mut request: ChatRequest,
        registry: &ToolRegistry,
    ) -> Result<ChatResponse, LlmError> {
        let backend = self.backends.get(config_name).ok_or_else(|| LlmError::NotConfigured {
            name: config_name.to_owned(),
        })?;

        self.restore_tool_schemas(&mut request, registry);

        backend.complete(&request).await
    }

    /// Re-attach authoritative parameter schemas from the registry
    ///
    /// Frontends may resend a tool definition stripped of its schema to
    /// save payload size; forwarding the empty schema would make the
    /// model guess at the argument shape.
    fn restore_tool_schemas(&self, request: &mut ChatRequest, registry: &ToolRegistry) {
        let Some(tools) = request.tools.as_mut() else {
            return;
        };

        for tool in tools {
            let stripped = tool.function.parameters.as_ref().is_none_or(is_empty_schema);
            if stripped
                && let Some(known) = registry.get(&tool.function.name)
            {
                self.logger
                    .debug(&format!("restoring schema for tool '{}'", tool.function.name));
                tool.function.parameters = Some(known.input_schema());
            }
        }
    }
}

/// Whether a schema conveys no argument shape at all
fn is_empty_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => {
            map.is_empty()
                || (map.get("type").and_then(Value::as_str) == Some("object") && !map.contains_key("properties"))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axon_core::{NoopLogger, Tool, ToolSource};
    use axon_tools::ToolRegistry;

    use crate::types::{FinishReason, FunctionDefinition, ResponseMessage, ToolDefinition, Usage};

    use super::*;

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Openai
        }

        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
            // surface the restored schema through the response id
            let schema = request
                .tools
                .as_ref()
                .and_then(|tools| tools.first())
                .and_then(|t| t.function.parameters.clone())
                .map_or_else(|| "none".to_owned(), |s| s.to_string());

            Ok(ChatResponse {
                id: schema,
                model: "echo-1".to_owned(),
                message: ResponseMessage {
                    role: "assistant".to_owned(),
                    content: Some("ok".to_owned()),
                    tool_calls: None,
                },
                finish_reason: FinishReason::Stop,
                usage: Usage::default(),
            })
        }
    }

    struct SchemaTool;

    #[async_trait]
    impl Tool for SchemaTool {
        fn name(&self) -> &str {
            "greet"
        }

        fn description(&self) -> &str {
            "greets"
        }

        fn input_schema(&self) -> Value {
            serde_json::json!({"type": "object", "properties": {"who": {"type": "string"}}})
        }

        fn source_id(&self) -> &str {
            "local"
        }

        fn source_type(&self) -> ToolSource {
            ToolSource::Server
        }

        async fn invoke(&self, _input: Value) -> anyhow::Result<Value> {
            Ok(Value::Null)
        }
    }

    fn dispatcher_with_echo() -> Dispatcher {
        let mut backends: IndexMap<String, Arc<dyn ChatBackend>> = IndexMap::new();
        backends.insert("echo".to_owned(), Arc::new(EchoBackend));
        Dispatcher::with_backends(backends, Arc::new(NoopLogger))
    }

    #[tokio::test]
    async fn unknown_configuration_is_not_configured() {
        let dispatcher = dispatcher_with_echo();
        let result = dispatcher
            .execute("ghost", ChatRequest::default(), &ToolRegistry::empty())
            .await;

        assert!(matches!(result, Err(LlmError::NotConfigured { .. })));
    }

    #[tokio::test]
    async fn stripped_schema_is_restored_from_the_registry() {
        let dispatcher = dispatcher_with_echo();
        let registry =
            ToolRegistry::build(vec![Arc::new(SchemaTool) as Arc<dyn Tool>], vec![]).expect("no collision");

        let request = ChatRequest {
            tools: Some(vec![ToolDefinition {
                tool_type: "function".to_owned(),
                function: FunctionDefinition {
                    name: "greet".to_owned(),
                    description: None,
                    parameters: None,
                },
            }]),
            ..ChatRequest::default()
        };

        let response = dispatcher.execute("echo", request, &registry).await.expect("ok");
        assert!(response.id.contains("properties"));
    }

    #[tokio::test]
    async fn full_schema_is_left_alone() {
        let dispatcher = dispatcher_with_echo();
        let registry =
            ToolRegistry::build(vec![Arc::new(SchemaTool) as Arc<dyn Tool>], vec![]).expect("no collision");

        let request = ChatRequest {
            tools: Some(vec![ToolDefinition {
                tool_type: "function".to_owned(),
                function: FunctionDefinition {
                    name: "greet".to_owned(),
                    description: None,
                    parameters: Some(serde_json::json!({
                        "type": "object",
                        "properties": {"custom": {"type": "number"}}
                    })),
                },
            }]),
            ..ChatRequest::default()
        };

        let response = dispatcher.execute("echo", request, &registry).await.expect("ok");
        assert!(response.id.contains("custom"));
    }

    #[test]
    fn empty_schemas_are_recognized() {
        assert!(is_empty_schema(&Value::Null));
        assert!(is_empty_schema(&serde_json::json!({})));
        assert!(is_empty_schema(&serde_json::json!({"type": "object"})));
        assert!(!is_empty_schema(&serde_json::json!({
            "type": "object",
            "properties": {"x": {"type": "string"}}
        })));
    }

    #[test]
    fn new_builds_one_backend_per_config() {
        let configs: Vec<AiConfig> = serde_json::from_value(serde_json::json!([
            {"name": "primary", "provider": "anthropic", "model": "claude-sonnet-4-20250514"},
            {"name": "fallback", "provider": "mistral", "model": "mistral-large-latest"}
        ]))
        .expect("valid configs");

        let dispatcher = Dispatcher::new(&configs, Arc::new(NoopLogger));
        assert!(dispatcher.contains("primary"));
        assert!(dispatcher.contains("fallback"));
        assert!(!dispatcher.contains("ghost"));
    }
}
