use std::time::Duration;

use crate::Environment;

/// Connection settings for the identity service.
///
/// Every [`crate::ApiClient`] owns its own copy; there is no process-wide
/// default to mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the command namespace, without a trailing slash. Commands are
    /// addressed as `<base_url>/<command>.json`.
    pub base_url: String,
    /// Host name embedded in the key descriptor of every statement.
    pub host: String,
    /// Client software name reported inside service-binding statements.
    pub client_name: String,
    /// Client software version reported inside service-binding statements.
    pub client_version: String,
    /// Deadline applied to every request.
    pub timeout: Duration,
}

/// Per-request deadline applied when none is configured explicitly.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

impl Config {
    /// Settings for one of the well-known deployments.
    #[must_use]
    pub fn from_environment(environment: &Environment) -> Self {
        match environment {
            Environment::Staging => {
                Self::custom("https://api.stage.proofkit.dev/_/api/1.0", "proofkit.dev")
            }
            Environment::Production => {
                Self::custom("https://api.proofkit.dev/_/api/1.0", "proofkit.dev")
            }
        }
    }

    /// Settings for a self-hosted deployment.
    #[must_use]
    pub fn custom(base_url: &str, host: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host: host.to_string(),
            client_name: "proofkit-core".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
