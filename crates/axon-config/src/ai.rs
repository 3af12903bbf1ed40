use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// One addressable LLM backend
///
/// Multiple configurations may coexist; callers select one by `name` at
/// request time. Immutable after construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiConfig {
    /// Name callers use to select this backend
    pub name: String,
    /// Provider protocol
    pub provider: ProviderKind,
    /// Model identifier sent to the provider
    pub model: String,
    /// Credential material
    #[serde(default)]
    pub credentials: AiCredentials,
    /// Arbitrary provider-specific options (e.g. `max_tokens`)
    #[serde(default)]
    pub provider_options: serde_json::Map<String, serde_json::Value>,
}

/// Supported LLM provider protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI chat completions API
    Openai,
    /// Anthropic Messages API
    Anthropic,
    /// Mistral chat API (OpenAI-compatible wire format)
    Mistral,
}

impl ProviderKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Mistral => "mistral",
        }
    }
}

/// Credentials for an AI backend
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AiCredentials {
    /// API key for authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<Url>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_config() {
        let config: AiConfig = toml::from_str(
            r#"
            name = "default"
            provider = "anthropic"
            model = "claude-sonnet-4-20250514"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.name, "default");
        assert_eq!(config.provider, ProviderKind::Anthropic);
        assert!(config.credentials.api_key.is_none());
        assert!(config.provider_options.is_empty());
    }

    #[test]
    fn rejects_unknown_provider() {
        let result: Result<AiConfig, _> = toml::from_str(
            r#"
            name = "default"
            provider = "cohere"
            model = "command"
            "#,
        );
        assert!(result.is_err());
    }
}
