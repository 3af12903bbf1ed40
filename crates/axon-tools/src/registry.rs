use std::collections::HashMap;
use std::sync::Arc;

use axon_core::{Tool, ToolSource, sanitize_tool_name};
use serde::Serialize;
use serde_json::Value;

use crate::error::ToolError;

/// Tool definition exported for UI enumeration
///
/// Listing definitions never triggers tool execution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrontendToolDefinition {
    /// Sanitized, addressable name
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's input
    pub schema: Value,
    /// Which server or integration produced this tool
    pub source_id: String,
    pub source_type: ToolSource,
}

/// Request-scoped catalogue of every addressable tool
///
/// Built per invocation by concatenating local integration tools with
/// tools discovered from connected servers, then discarded. Lookups go
/// through the sanitized name so a tool whose natural name contains
/// spaces or punctuation stays callable.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Merge local and discovered tools into one addressable collection
    ///
    /// Two distinct tool names sanitizing to the same identifier is a
    /// configuration conflict: lookup could silently route a model's
    /// call to the wrong implementation, so registration rejects it.
    pub fn build(local: Vec<Arc<dyn Tool>>, discovered: Vec<Arc<dyn Tool>>) -> Result<Self, ToolError> {
        let mut tools = local;
        tools.extend(discovered);

        let mut by_name = HashMap::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            let sanitized = tool.sanitized_name();
            if let Some(&existing) = by_name.get(&sanitized) {
                let existing: &Arc<dyn Tool> = &tools[existing];
                return Err(ToolError::NameCollision {
                    first: existing.name().to_owned(),
                    second: tool.name().to_owned(),
                    sanitized,
                });
            }
            by_name.insert(sanitized, index);
        }

        Ok(Self { tools, by_name })
    }

    /// Empty registry
    pub fn empty() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up a tool by name; accepts natural or sanitized form
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name
            .get(&sanitize_tool_name(name))
            .map(|&index| &self.tools[index])
    }

    /// Invoke a tool by name with an opaque JSON input
    ///
    /// Failures from the underlying tool are wrapped with the original
    /// message; the raw error type never leaks to callers.
    pub async fn invoke(&self, name: &str, input: Value) -> Result<Value, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound {
            tool: name.to_owned(),
        })?;

        tool.invoke(input).await.map_err(|e| ToolError::Execution {
            tool: tool.name().to_owned(),
            message: e.to_string(),
        })
    }

    /// Definitions for UI enumeration
    pub fn frontend_definitions(&self) -> Vec<FrontendToolDefinition> {
        self.tools
            .iter()
            .map(|tool| FrontendToolDefinition {
                name: tool.sanitized_name(),
                description: tool.description().to_owned(),
                schema: tool.input_schema(),
                source_id: tool.source_id().to_owned(),
                source_type: tool.source_type(),
            })
            .collect()
    }
}
