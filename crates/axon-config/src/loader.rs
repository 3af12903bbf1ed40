use serde::Deserialize;

use crate::ai::AiConfig;
use crate::credentials::IntegrationCredentials;

/// Root configuration for an Axon host
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxonConfig {
    /// AI backend configurations, in priority order
    #[serde(default)]
    pub ai: Vec<AiConfig>,
    /// Credential material for local integration tools
    #[serde(default)]
    pub integrations: IntegrationCredentials,
}

impl AxonConfig {
    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or validation finds duplicate
    /// backend names.
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = std::collections::HashSet::new();
        for config in &self.ai {
            if config.name.is_empty() {
                anyhow::bail!("AI configuration with empty name");
            }
            if !seen.insert(config.name.as_str()) {
                anyhow::bail!("duplicate AI configuration name: {}", config.name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_full_config() {
        let config = AxonConfig::from_toml_str(
            r#"
            [[ai]]
            name = "primary"
            provider = "anthropic"
            model = "claude-sonnet-4-20250514"
            credentials = { api_key = "sk-ant-test" }
            provider_options = { max_tokens = 2048 }

            [[ai]]
            name = "fallback"
            provider = "openai"
            model = "gpt-4o"

            [integrations]
            slack_api_token = "xoxb-test"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.ai.len(), 2);
        assert_eq!(config.ai[0].name, "primary");
        assert!(config.integrations.contains("slack_api_token"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = AxonConfig::from_toml_str(
            r#"
            [[ai]]
            name = "primary"
            provider = "openai"
            model = "gpt-4o"

            [[ai]]
            name = "primary"
            provider = "mistral"
            model = "mistral-large-latest"
            "#,
        );
        assert!(result.is_err());
    }
}
