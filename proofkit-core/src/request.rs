use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ProofKitError;

/// Status name used by the service for a success envelope.
const STATUS_OK: &str = "OK";

/// Status name returned when a submitted statement lost the race for its
/// chain position.
const STATUS_WRONG_SEQNO: &str = "WRONG_SEQNO";

/// The status block every service response carries.
///
/// `code == 0 && name == "OK"` means success; anything else is the error the
/// service wants the caller to see.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteStatus {
    /// Numeric status code, `0` on success.
    pub code: i64,
    /// Symbolic status name, `"OK"` on success.
    pub name: String,
    /// Optional human-readable description of a failure.
    #[serde(default)]
    pub desc: Option<String>,
}

impl RemoteStatus {
    pub(crate) fn is_ok(&self) -> bool {
        self.code == 0 && self.name == STATUS_OK
    }

    /// True when this status reports a chain-position conflict.
    #[must_use]
    pub fn is_chain_conflict(&self) -> bool {
        self.name == STATUS_WRONG_SEQNO
    }

    pub(crate) fn into_result(self) -> Result<(), ProofKitError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(ProofKitError::Remote { status: self })
        }
    }
}

impl fmt::Display for RemoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)?;
        if let Some(desc) = &self.desc {
            write!(f, ": {desc}")?;
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct StatusEnvelope {
    status: RemoteStatus,
}

/// A thin wrapper on an HTTP client. Applies the configured deadline and a
/// `User-Agent` header to every request.
#[derive(Debug)]
pub(crate) struct Request {
    client: reqwest::Client,
    timeout: Duration,
}

impl Request {
    pub(crate) fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    fn req(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url).timeout(self.timeout).header(
            "User-Agent",
            format!("proofkit-core/{}", env!("CARGO_PKG_VERSION")),
        )
    }

    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.req(Method::GET, url)
    }

    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.req(Method::POST, url)
    }

    /// Executes a request and decodes the response. The status envelope is
    /// checked before the command payload, so a failure envelope surfaces
    /// as [`ProofKitError::Remote`] even when the command-specific fields
    /// are absent from the body. No retries.
    pub(crate) async fn send<T>(&self, request_builder: RequestBuilder) -> Result<T, ProofKitError>
    where
        T: DeserializeOwned,
    {
        let response = request_builder.send().await?;
        let url = response.url().to_string();
        let http_status = response.status();
        let body = response.text().await?;

        let envelope: StatusEnvelope = serde_json::from_str(&body).map_err(|err| {
            if http_status.is_success() {
                ProofKitError::Serialization(format!("undecodable response from {url}: {err}"))
            } else {
                ProofKitError::Transport {
                    url: url.clone(),
                    status: Some(http_status.as_u16()),
                    error: format!("request failed with status {http_status}"),
                }
            }
        })?;
        envelope.status.into_result()?;

        serde_json::from_str(&body).map_err(|err| {
            ProofKitError::Serialization(format!("undecodable response from {url}: {err}"))
        })
    }
}
