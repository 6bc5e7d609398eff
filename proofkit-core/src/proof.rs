use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ProofKitError;
use crate::session::Session;

#[derive(Deserialize)]
struct PostAuthResponse {
    auth_token: String,
    csrf_token: String,
}

#[derive(Deserialize)]
struct PostBindingResponse {
    proof_text: String,
    sig_id: String,
    proof_id: String,
    payload_hash: String,
    csrf_token: String,
}

/// Server acknowledgement of a submitted service binding.
///
/// Terminal for the workflow: the statement is now part of the chain and
/// the proof text is what the user publishes on the external service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    /// Text to post on the external service.
    pub proof_text: String,
    /// Identifier of the accepted signature.
    pub sig_id: String,
    /// Identifier of the proof record.
    pub proof_id: String,
    /// Hash of the signed payload as the server recorded it.
    pub payload_hash: String,
}

fn signature_field(signature: &[u8]) -> Result<&str, ProofKitError> {
    std::str::from_utf8(signature)
        .map_err(|err| ProofKitError::Serialization(format!("signature is not UTF-8: {err}")))
}

impl ApiClient {
    /// Posts a signature over an auth assertion and returns the decoded
    /// authentication token. Rotates the anti-forgery token.
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] on a non-success envelope, transport or
    /// serialization errors otherwise. Never retries: a timed-out
    /// submission has an unknown outcome.
    pub async fn post_auth_signature(
        &self,
        session: &mut Session,
        signature: &[u8],
    ) -> Result<Vec<u8>, ProofKitError> {
        let sig = signature_field(signature)?;
        let form = [
            ("session", session.session_id().to_string()),
            ("csrf_token", session.csrf_token().to_string()),
            (
                "email_or_username",
                session.user().basics.username.clone(),
            ),
            ("sig", sig.to_string()),
        ];

        let url = self.command_url("sig/post_auth");
        let response: PostAuthResponse =
            self.request.send(self.request.post(&url).form(&form)).await?;

        session.rotate_token(response.csrf_token);
        hex::decode(&response.auth_token)
            .map_err(|err| ProofKitError::Serialization(format!("auth_token: {err}")))
    }

    /// Posts a signature over a service-binding assertion and returns the
    /// resulting [`Proof`]. Rotates the anti-forgery token.
    ///
    /// A chain-conflict answer (see [`ProofKitError::is_chain_conflict`])
    /// means the embedded position went stale; recovery is a fresh
    /// build-sign-post round, never a resubmission of the same bytes.
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] on a non-success envelope, transport or
    /// serialization errors otherwise. Never retries.
    pub async fn post_service_binding(
        &self,
        session: &mut Session,
        signature: &[u8],
        external_username: &str,
        service: &str,
    ) -> Result<Proof, ProofKitError> {
        let sig = signature_field(signature)?;
        let form = [
            ("sig", sig.to_string()),
            ("remote_username", external_username.to_string()),
            ("type", format!("web_service_binding.{service}")),
            ("session", session.session_id().to_string()),
            ("csrf_token", session.csrf_token().to_string()),
        ];

        let url = self.command_url("sig/post");
        let response: PostBindingResponse =
            self.request.send(self.request.post(&url).form(&form)).await?;

        session.rotate_token(response.csrf_token);
        log::debug!("service binding accepted, proof_id={}", response.proof_id);
        Ok(Proof {
            proof_text: response.proof_text,
            sig_id: response.sig_id,
            proof_id: response.proof_id,
            payload_hash: response.payload_hash,
        })
    }
}
