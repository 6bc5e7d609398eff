//! Two-phase sign-then-post flows.
//!
//! Each helper runs one statement through build → sign → post. The signing
//! step goes to the injected [`Signer`] and may block on interactive secret
//! entry; the only state held across that pause is the exclusive borrow of
//! this workflow's own session, so other sessions proceed unhindered.
//!
//! A failed post with [`ProofKitError::is_chain_conflict`] means another
//! workflow won the race for the chain position. The whole helper can be
//! re-run: it fetches a new position and produces a new signature. The old
//! frozen bytes are stale and are never resubmitted.

use crate::client::ApiClient;
use crate::error::ProofKitError;
use crate::proof::Proof;
use crate::session::Session;
use crate::signer::Signer;

/// Runs the login auth assertion through sign-then-post and returns the
/// decoded authentication token.
///
/// # Errors
/// [`ProofKitError::NoPublicKey`] when the principal has no primary key,
/// [`ProofKitError::Signing`] from the oracle, otherwise whatever the
/// submission surfaces.
pub async fn authenticate(
    client: &ApiClient,
    session: &mut Session,
    signer: &dyn Signer,
    now: Option<u64>,
) -> Result<Vec<u8>, ProofKitError> {
    let fingerprint = session.user().require_primary_key()?.fingerprint.clone();
    let frozen = client.build_auth_assertion(session, now)?;
    let signature = signer.sign(frozen.payload(), &fingerprint)?;
    client.post_auth_signature(session, &signature).await
}

/// Runs a service binding through position-fetch → build → sign → post and
/// returns the server's [`Proof`].
///
/// # Errors
/// [`ProofKitError::NoPublicKey`] when the principal has no primary key,
/// [`ProofKitError::Signing`] from the oracle, otherwise whatever the
/// sequencer or submission surfaces.
pub async fn bind_service(
    client: &ApiClient,
    session: &mut Session,
    signer: &dyn Signer,
    service: &str,
    external_username: &str,
    now: Option<u64>,
) -> Result<Proof, ProofKitError> {
    let fingerprint = session.user().require_primary_key()?.fingerprint.clone();
    let frozen = client
        .build_service_binding(session, service, external_username, now)
        .await?;
    let signature = signer.sign(frozen.payload(), &fingerprint)?;
    client
        .post_service_binding(session, &signature, external_username, service)
        .await
}
