use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ProofKitError;
use crate::session::Session;

#[derive(Deserialize)]
struct NextSeqnoResponse {
    seqno: u64,
    // Absent or null for a chain with no links yet.
    #[serde(default)]
    prev: Option<String>,
    csrf_token: String,
}

/// Where the next statement attaches to the principal's chain: the sequence
/// number it must carry and the digest of the current tip.
///
/// A position is a hint, not a reservation. It stays valid only until the
/// server accepts any statement for this principal, so it must be fetched
/// fresh for every statement and never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainPosition {
    /// Sequence number the next statement must carry.
    pub seqno: u64,
    /// Digest of the statement at `seqno - 1`. Empty for a chain with no
    /// links yet.
    pub prev: String,
}

impl ApiClient {
    /// Reads the next chain position for the session's principal and
    /// rotates the anti-forgery token.
    ///
    /// Two concurrent workflows for one principal can be handed the same
    /// position; the server accepts only the first submission and answers
    /// the other with a chain-conflict status (see
    /// [`ProofKitError::is_chain_conflict`]).
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] on a non-success envelope, transport or
    /// serialization errors otherwise.
    pub async fn next_position(
        &self,
        session: &mut Session,
    ) -> Result<ChainPosition, ProofKitError> {
        let url = self.command_url("sig/next_seqno");
        let response: NextSeqnoResponse = self
            .request
            .send(self.request.get(&url).query(&[
                ("type", "PUBLIC"),
                ("session", session.session_id()),
            ]))
            .await?;

        session.rotate_token(response.csrf_token);
        Ok(ChainPosition {
            seqno: response.seqno,
            prev: response.prev.unwrap_or_default(),
        })
    }
}
