use crate::config::Config;
use crate::request::Request;

/// HTTP client for the identity service, bound to a [`Config`].
///
/// Session-free lookups take `&self` and may run concurrently. Calls that
/// mutate a [`crate::Session`] take it by `&mut`, which serializes them per
/// session at compile time; independent sessions never block each other.
#[derive(Debug)]
pub struct ApiClient {
    pub(crate) config: Config,
    pub(crate) request: Request,
}

impl ApiClient {
    /// Creates a client for the given deployment settings.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let request = Request::new(config.timeout);
        Self { config, request }
    }

    /// The settings this client was created with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn command_url(&self, command: &str) -> String {
        format!("{}/{command}.json", self.config.base_url)
    }
}
