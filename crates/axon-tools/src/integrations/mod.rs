//! Local integration tools
//!
//! Statically configured tools wrapping third-party HTTP APIs. An
//! integration is instantiated only when its required credential key is
//! present; a missing key omits the integration's tools rather than
//! failing the request.

pub mod slack;

use std::sync::Arc;

use axon_config::IntegrationCredentials;
use axon_core::{SharedLogger, Tool};

/// Instantiate every integration whose credentials are present
pub fn local_tools(credentials: &IntegrationCredentials, logger: &SharedLogger) -> Vec<Arc<dyn Tool>> {
    let mut tools: Vec<Arc<dyn Tool>> = Vec::new();

    match slack::SlackIntegration::from_credentials(credentials) {
        Some(integration) => tools.extend(integration.into_tools()),
        None => logger.debug("slack credentials absent, skipping integration tools"),
    }

    tools
}

#[cfg(test)]
mod tests {
    use axon_core::NoopLogger;
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn no_credentials_means_no_local_tools() {
        let logger: SharedLogger = Arc::new(NoopLogger);
        let tools = local_tools(&IntegrationCredentials::new(), &logger);
        assert!(tools.is_empty());
    }

    #[test]
    fn slack_credentials_enable_slack_tools() {
        let logger: SharedLogger = Arc::new(NoopLogger);
        let mut credentials = IntegrationCredentials::new();
        credentials.insert(slack::SLACK_API_TOKEN_KEY, SecretString::from("xoxb-test"));

        let tools = local_tools(&credentials, &logger);
        let names: Vec<_> = tools.iter().map(|t| t.name().to_owned()).collect();
        assert!(names.contains(&"search_messages".to_owned()));
        assert!(names.contains(&"list_channels".to_owned()));
    }
}
