//! Canonical statement construction.
//!
//! A statement is signed over its exact serialized bytes, and the service
//! recomputes the payload hash from what the signature envelops. The structs
//! here therefore declare their fields in wire order, are serialized exactly
//! once, and the resulting bytes travel with the statement in a
//! [`FrozenStatement`]. Re-serializing a statement that has since been
//! touched can never invalidate a signature already produced against the
//! frozen bytes.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::ProofKitError;
use crate::session::Session;

/// Statement format version spoken by this client.
const STATEMENT_VERSION: u32 = 1;

/// Trailing tag of every signable statement.
const TAG_SIGNATURE: &str = "signature";

/// Validity horizon of an auth assertion: 24 hours.
pub const AUTH_EXPIRY_SECS: u64 = 86_400;

/// Validity horizon of a service binding: 5 years.
pub const BINDING_EXPIRY_SECS: u64 = 157_680_000;

/// Identifies the signing key and its owner inside a statement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDescriptor {
    /// Fingerprint of the signing key, lowercase hex.
    pub fingerprint: String,
    /// Host name of the identity service the statement is addressed to.
    pub host: String,
    /// Server-assigned identifier of the signing key.
    pub key_id: String,
    /// The signing user's identifier.
    pub uid: String,
    /// The signing user's username.
    pub username: String,
}

/// The client software that produced a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    /// Software name.
    pub name: String,
    /// Software version.
    pub version: String,
}

/// The external account a service binding vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTarget {
    /// External service name, e.g. `"twitter"`.
    pub name: String,
    /// Claimed username on that service.
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct AuthBody {
    key: KeyDescriptor,
    string: String,
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct BindingBody {
    client: ClientInfo,
    key: KeyDescriptor,
    service: ServiceTarget,
    #[serde(rename = "type")]
    kind: &'static str,
    version: u32,
}

/// A short-lived, standalone declaration that the holder of the primary key
/// is authenticating. Consumes no chain position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthAssertion {
    body: AuthBody,
    ctime: u64,
    expires_in: u64,
    tag: &'static str,
}

/// A chain-anchored claim that the principal controls an account on an
/// external service. Carries the chain position it attaches at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceBindingAssertion {
    body: BindingBody,
    ctime: u64,
    expire_in: u64,
    prev: String,
    seqno: u64,
    tag: &'static str,
}

/// A canonical, signable declaration of identity or binding intent.
///
/// Immutable value object; constructing one mutates neither session nor
/// chain state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    /// Login assertion (24-hour validity, no chain position).
    Auth(AuthAssertion),
    /// External-service binding (5-year validity, chain-anchored).
    ServiceBinding(ServiceBindingAssertion),
}

impl Statement {
    /// The chain sequence number, for chain-anchored variants.
    #[must_use]
    pub const fn seqno(&self) -> Option<u64> {
        match self {
            Self::Auth(_) => None,
            Self::ServiceBinding(binding) => Some(binding.seqno),
        }
    }

    /// The previous-link digest, for chain-anchored variants.
    #[must_use]
    pub fn prev(&self) -> Option<&str> {
        match self {
            Self::Auth(_) => None,
            Self::ServiceBinding(binding) => Some(&binding.prev),
        }
    }

    /// Creation time, unix seconds.
    #[must_use]
    pub const fn ctime(&self) -> u64 {
        match self {
            Self::Auth(auth) => auth.ctime,
            Self::ServiceBinding(binding) => binding.ctime,
        }
    }
}

/// A statement together with the exact bytes the signer must consume.
///
/// The payload is produced once, when the statement is built. Signatures
/// must be computed over [`FrozenStatement::payload`], never over a fresh
/// serialization.
#[derive(Debug, Clone)]
pub struct FrozenStatement {
    statement: Statement,
    payload: Vec<u8>,
}

impl FrozenStatement {
    fn freeze(statement: Statement) -> Result<Self, ProofKitError> {
        let payload = serde_json::to_vec(&statement)
            .map_err(|err| ProofKitError::Serialization(err.to_string()))?;
        Ok(Self { statement, payload })
    }

    /// The bytes to sign.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The statement the payload was frozen from.
    #[must_use]
    pub const fn statement(&self) -> &Statement {
        &self.statement
    }
}

fn unix_now(now: Option<u64>) -> Result<u64, ProofKitError> {
    now.map_or_else(
        || {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_secs())
                .map_err(|err| ProofKitError::Generic {
                    error: format!("unable to determine system time: {err}"),
                })
        },
        Ok,
    )
}

fn key_descriptor(config: &Config, session: &Session) -> Result<KeyDescriptor, ProofKitError> {
    let key = session.user().require_primary_key()?;
    Ok(KeyDescriptor {
        fingerprint: key.fingerprint.clone(),
        host: config.host.clone(),
        key_id: key.key_id.clone(),
        uid: session.uid().to_string(),
        username: session.user().basics.username.clone(),
    })
}

impl ApiClient {
    /// Builds the login auth assertion for the session's principal. Purely
    /// local: no network call and no chain position. Pass `now` to pin the
    /// creation time; defaults to the system clock.
    ///
    /// # Errors
    /// [`ProofKitError::NoPublicKey`] when the principal has no primary key.
    pub fn build_auth_assertion(
        &self,
        session: &Session,
        now: Option<u64>,
    ) -> Result<FrozenStatement, ProofKitError> {
        let key = key_descriptor(&self.config, session)?;
        let ctime = unix_now(now)?;
        FrozenStatement::freeze(Statement::Auth(AuthAssertion {
            body: AuthBody {
                key,
                string: String::new(),
                kind: "auth",
                version: STATEMENT_VERSION,
            },
            ctime,
            expires_in: AUTH_EXPIRY_SECS,
            tag: TAG_SIGNATURE,
        }))
    }

    /// Builds a service-binding assertion, fetching a fresh chain position
    /// for it first. Sequencer errors propagate unchanged; the primary-key
    /// precondition is checked before any network traffic.
    ///
    /// # Errors
    /// [`ProofKitError::NoPublicKey`] when the principal has no primary
    /// key; otherwise whatever [`ApiClient::next_position`] surfaces.
    pub async fn build_service_binding(
        &self,
        session: &mut Session,
        service: &str,
        external_username: &str,
        now: Option<u64>,
    ) -> Result<FrozenStatement, ProofKitError> {
        let key = key_descriptor(&self.config, session)?;
        let position = self.next_position(session).await?;
        let ctime = unix_now(now)?;
        FrozenStatement::freeze(Statement::ServiceBinding(ServiceBindingAssertion {
            body: BindingBody {
                client: ClientInfo {
                    name: self.config.client_name.clone(),
                    version: self.config.client_version.clone(),
                },
                key,
                service: ServiceTarget {
                    name: service.to_string(),
                    username: external_username.to_string(),
                },
                kind: "web_service_binding",
                version: STATEMENT_VERSION,
            },
            ctime,
            expire_in: BINDING_EXPIRY_SECS,
            prev: position.prev,
            seqno: position.seqno,
            tag: TAG_SIGNATURE,
        }))
    }
}
