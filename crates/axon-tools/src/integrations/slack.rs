//! Slack workspace integration
//!
//! Wraps the Slack Web API behind the generic tool contract: message
//! search and channel listing. Requires a bot token supplied through the
//! integration credentials map.

use std::sync::Arc;

use async_trait::async_trait;
use axon_config::IntegrationCredentials;
use axon_core::{Tool, ToolSource};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Well-known credential key for the Slack bot token
pub const SLACK_API_TOKEN_KEY: &str = "slack_api_token";

/// Optional credential key overriding the Slack API base URL
pub const SLACK_BASE_URL_KEY: &str = "slack_base_url";

const DEFAULT_BASE_URL: &str = "https://slack.com/api/";

/// Identifier used for frontend attribution
const SOURCE_ID: &str = "slack";

/// Shared state behind the Slack-backed tools
pub struct SlackIntegration {
    client: reqwest::Client,
    token: SecretString,
    base_url: Url,
}

impl SlackIntegration {
    /// Instantiate when the token credential is present
    pub fn from_credentials(credentials: &IntegrationCredentials) -> Option<Arc<Self>> {
        let token = credentials.get(SLACK_API_TOKEN_KEY)?.clone();

        let base_url = credentials
            .get(SLACK_BASE_URL_KEY)
            .and_then(|raw| Url::parse(raw.expose_secret()).ok())
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("valid default URL"));

        Some(Arc::new(Self {
            client: reqwest::Client::new(),
            token,
            base_url,
        }))
    }

    /// The tools this integration contributes
    pub fn into_tools(self: Arc<Self>) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(SearchMessagesTool {
                integration: Arc::clone(&self),
            }),
            Arc::new(ListChannelsTool { integration: self }),
        ]
    }

    fn endpoint(&self, method: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{method}")
    }

    async fn call(&self, method: &str, params: &[(&str, String)]) -> anyhow::Result<Value> {
        let response = self
            .client
            .get(self.endpoint(method))
            .bearer_auth(self.token.expose_secret())
            .query(params)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("slack request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("slack returned {status}");
        }

        let body: SlackEnvelope = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("failed to parse slack response: {e}"))?;

        if !body.ok {
            anyhow::bail!("slack error: {}", body.error.unwrap_or_else(|| "unknown".to_owned()));
        }

        Ok(body.rest)
    }
}

/// Slack wraps every response in an `ok`/`error` envelope
#[derive(Debug, Deserialize)]
struct SlackEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    rest: Value,
}

/// Search messages across the workspace
struct SearchMessagesTool {
    integration: Arc<SlackIntegration>,
}

#[async_trait]
impl Tool for SearchMessagesTool {
    fn name(&self) -> &str {
        "search_messages"
    }

    fn description(&self) -> &str {
        "Search messages in the connected Slack workspace"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query, supports Slack search modifiers"
                },
                "count": {
                    "type": "integer",
                    "description": "Maximum number of results (default 20)"
                }
            },
            "required": ["query"]
        })
    }

    fn source_id(&self) -> &str {
        SOURCE_ID
    }

    fn source_type(&self) -> ToolSource {
        ToolSource::Server
    }

    async fn invoke(&self, input: Value) -> anyhow::Result<Value> {
        let query = input
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow::anyhow!("missing required 'query' argument"))?
            .to_owned();

        let count = input.get("count").and_then(Value::as_u64).unwrap_or(20);

        self.integration
            .call("search.messages", &[("query", query), ("count", count.to_string())])
            .await
    }
}

/// List channels visible to the integration's token
struct ListChannelsTool {
    integration: Arc<SlackIntegration>,
}

#[async_trait]
impl Tool for ListChannelsTool {
    fn name(&self) -> &str {
        "list_channels"
    }

    fn description(&self) -> &str {
        "List channels in the connected Slack workspace"
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of channels to return (default 100)"
                }
            }
        })
    }

    fn source_id(&self) -> &str {
        SOURCE_ID
    }

    fn source_type(&self) -> ToolSource {
        ToolSource::Server
    }

    async fn invoke(&self, input: Value) -> anyhow::Result<Value> {
        let limit = input.get("limit").and_then(Value::as_u64).unwrap_or(100);

        self.integration
            .call("conversations.list", &[("limit", limit.to_string())])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integration() -> Arc<SlackIntegration> {
        let mut credentials = IntegrationCredentials::new();
        credentials.insert(SLACK_API_TOKEN_KEY, SecretString::from("xoxb-test"));
        SlackIntegration::from_credentials(&credentials).expect("token present")
    }

    #[test]
    fn absent_token_disables_the_integration() {
        assert!(SlackIntegration::from_credentials(&IntegrationCredentials::new()).is_none());
    }

    #[test]
    fn tools_carry_local_provenance() {
        for tool in integration().into_tools() {
            assert_eq!(tool.source_id(), "slack");
            assert_eq!(tool.source_type(), ToolSource::Server);
        }
    }

    #[test]
    fn endpoint_joins_without_duplicate_slashes() {
        assert_eq!(
            integration().endpoint("search.messages"),
            "https://slack.com/api/search.messages"
        );
    }

    #[tokio::test]
    async fn search_requires_a_query() {
        let tools = integration().into_tools();
        let search = tools.iter().find(|t| t.name() == "search_messages").expect("present");

        let result = search.invoke(serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
