use std::sync::Arc;

use axon_config::{AiConfig, IntegrationCredentials};
use axon_core::{SharedLogger, Tool};
use axon_llm::{ChatResponse, Dispatcher};
use axon_mcp::{ToolServerClient, oauth};
use axon_tools::{FrontendToolDefinition, ToolRegistry, integrations};
use serde_json::Value;

use crate::error::RouteError;
use crate::request::{OP_EXECUTE_QUERY, OP_INVOKE_TOOL, OP_LIST_TOOLS, RouteRequest, parse_chat_body};

/// Result of one routing invocation
#[derive(Debug)]
pub enum RouteOutcome {
    /// Canonical LLM response for execute-query
    Completion(ChatResponse),
    /// Opaque tool output for invoke-tool
    ToolOutput(Value),
    /// Frontend definitions for list-tools
    ToolDefinitions(Vec<FrontendToolDefinition>),
}

/// Top-level entry point
///
/// Owns the read-only AI configuration list for its lifetime; everything
/// else — tool server client, discovered tools, registry — is scoped to
/// a single [`route`](Router::route) call and discarded at its end.
pub struct Router {
    configs: Vec<AiConfig>,
    credentials: IntegrationCredentials,
    dispatcher: Dispatcher,
    logger: SharedLogger,
}

impl Router {
    /// Build a router, constructing one backend per AI configuration
    pub fn new(configs: Vec<AiConfig>, credentials: IntegrationCredentials, logger: SharedLogger) -> Self {
        let dispatcher = Dispatcher::new(&configs, logger.clone());
        Self {
            configs,
            credentials,
            dispatcher,
            logger,
        }
    }

    /// Build a router around a pre-constructed dispatcher
    ///
    /// Lets embedding hosts and tests supply their own backends.
    pub fn with_dispatcher(
        configs: Vec<AiConfig>,
        credentials: IntegrationCredentials,
        dispatcher: Dispatcher,
        logger: SharedLogger,
    ) -> Self {
        Self {
            configs,
            credentials,
            dispatcher,
            logger,
        }
    }

    /// Route one request
    ///
    /// Token extraction and injection run before any connection attempt;
    /// tool server connections are closed on every exit path, and a close
    /// failure is logged without ever replacing the branch outcome.
    pub async fn route(&self, request: RouteRequest) -> Result<RouteOutcome, RouteError> {
        let tokens = oauth::extract_tokens(&request.headers)?;

        let client = match &request.tool_servers {
            Some(set) if !set.is_empty() => {
                let injected = oauth::inject_tokens(set, tokens.as_ref())?;
                Some(ToolServerClient::new(injected, self.logger.clone()))
            }
            _ => None,
        };

        let result = self.perform(&request, client.as_ref()).await;

        if let Some(client) = &client {
            client.close_connections().await;
        }

        result
    }

    async fn perform(
        &self,
        request: &RouteRequest,
        client: Option<&ToolServerClient>,
    ) -> Result<RouteOutcome, RouteError> {
        // Discovery completes, with any partial failure recorded, before
        // anything downstream sees the tool list
        let discovered: Vec<Arc<dyn Tool>> = match client {
            Some(client) => client.load_tools().await,
            None => Vec::new(),
        };

        let local = integrations::local_tools(&self.credentials, &self.logger);
        let registry = ToolRegistry::build(local, discovered)?;

        match request.operation.as_str() {
            OP_EXECUTE_QUERY => {
                let body = parse_chat_body(request.body.as_ref())?;
                let config_name = self.select_config(request.query.config_name.as_deref())?;
                let response = self.dispatcher.execute(&config_name, body, &registry).await?;
                Ok(RouteOutcome::Completion(response))
            }
            OP_INVOKE_TOOL => {
                let tool_name = request
                    .query
                    .tool_name
                    .as_deref()
                    .ok_or_else(|| RouteError::InvalidRequest("invoke-tool requires a toolName".to_owned()))?;
                let input = request.body.clone().unwrap_or(Value::Null);
                let output = registry.invoke(tool_name, input).await?;
                Ok(RouteOutcome::ToolOutput(output))
            }
            OP_LIST_TOOLS => Ok(RouteOutcome::ToolDefinitions(registry.frontend_definitions())),
            other => Err(RouteError::NoAction {
                operation: other.to_owned(),
                query: request.query.describe(),
            }),
        }
    }

    /// Resolve the AI configuration name to dispatch against
    ///
    /// A requested-but-missing name falls back to the first configured
    /// backend with a warning naming the missing configuration; no
    /// configured backend at all is an error.
    fn select_config(&self, requested: Option<&str>) -> Result<String, RouteError> {
        let first = self.configs.first().ok_or(RouteError::NoBackends)?;

        match requested {
            Some(name) => {
                if self.configs.iter().any(|c| c.name == name) {
                    Ok(name.to_owned())
                } else {
                    self.logger.warn(&format!(
                        "AI configuration '{name}' not found, falling back to '{}'",
                        first.name
                    ));
                    Ok(first.name.clone())
                }
            }
            None => Ok(first.name.clone()),
        }
    }
}
