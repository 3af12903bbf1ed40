use indexmap::IndexMap;
use secrecy::SecretString;
use serde::Deserialize;

/// Opaque credential material for local integration tools
///
/// One well-known key per integration. Absence of a key simply omits that
/// integration's tools; it never fails a request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationCredentials(IndexMap<String, SecretString>);

impl IntegrationCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a credential by its well-known key
    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a credential, replacing any existing value for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: SecretString) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_is_none() {
        let credentials = IntegrationCredentials::new();
        assert!(credentials.get("slack_api_token").is_none());
    }

    #[test]
    fn insert_and_lookup() {
        let mut credentials = IntegrationCredentials::new();
        credentials.insert("slack_api_token", SecretString::from("xoxb-123"));
        assert!(credentials.contains("slack_api_token"));
    }
}
