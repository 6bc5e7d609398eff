use thiserror::Error;

use crate::request::RemoteStatus;

/// Error outputs from `proofkit-core`.
#[derive(Debug, Error)]
pub enum ProofKitError {
    /// The service answered with a non-success status envelope. Carries the
    /// server-supplied code, name and description verbatim.
    #[error("remote_error: {status}")]
    Remote {
        /// The status block returned by the service.
        status: RemoteStatus,
    },
    /// The response arrived but could not be interpreted (bad HTTP status
    /// with an unparseable body).
    #[error("transport_error: {url}: {error}")]
    Transport {
        /// The request URL.
        url: String,
        /// The HTTP status code, when one was received.
        status: Option<u16>,
        /// Description of the failure.
        error: String,
    },
    /// HTTP request failure (connection, TLS, timeout).
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    /// Unexpected error encoding a statement or decoding a response field.
    #[error("serialization_error: {0}")]
    Serialization(String),
    /// Password stretching failed.
    #[error("key_derivation_error: {0}")]
    KeyDerivation(String),
    /// The principal has no "primary" public key to sign with.
    #[error("no_public_key")]
    NoPublicKey,
    /// The injected signing oracle failed.
    #[error("signing_error: {0}")]
    Signing(String),
    /// Unhandled error.
    #[error("{error}")]
    Generic {
        /// Description of the failure.
        error: String,
    },
}

impl ProofKitError {
    /// True when the service rejected a submission because its embedded
    /// chain position is no longer the tip. The statement must be rebuilt
    /// from a fresh position and re-signed; resubmitting the same bytes can
    /// never succeed.
    #[must_use]
    pub fn is_chain_conflict(&self) -> bool {
        matches!(self, Self::Remote { status } if status.is_chain_conflict())
    }

    /// True for network-level failures where the outcome of the request is
    /// unknown. Submissions are not idempotent; callers should re-check the
    /// chain tip before retrying one of these.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Reqwest(_))
    }
}
