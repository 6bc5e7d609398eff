use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ProofKitError;
use crate::session::Session;
use crate::user::{PublicKeyInfo, PRIMARY_KEY_ROLE};

#[derive(Deserialize)]
struct AddKeyResponse {
    kid: String,
    csrf_token: String,
}

#[derive(Deserialize)]
struct RevokeKeyResponse {
    csrf_token: String,
}

impl ApiClient {
    /// Uploads an armored public key as the principal's primary key and
    /// returns the server-assigned key id. The principal's key map is
    /// updated in place; the fingerprint is server-computed, so callers
    /// that need it immediately should refresh via
    /// [`ApiClient::lookup_user`].
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] on a non-success envelope, transport or
    /// serialization errors otherwise.
    pub async fn add_key(
        &self,
        session: &mut Session,
        public_key: &str,
    ) -> Result<String, ProofKitError> {
        let form = [
            ("csrf_token", session.csrf_token().to_string()),
            ("public_key", public_key.to_string()),
            ("is_primary", "true".to_string()),
            ("session", session.session_id().to_string()),
        ];

        let url = self.command_url("key/add");
        let response: AddKeyResponse =
            self.request.send(self.request.post(&url).form(&form)).await?;

        session.rotate_token(response.csrf_token);
        session.user.public_keys.insert(
            PRIMARY_KEY_ROLE.to_string(),
            PublicKeyInfo {
                key_id: response.kid.clone(),
                fingerprint: String::new(),
                bundle: public_key.to_string(),
                ctime: 0,
                mtime: 0,
            },
        );
        log::debug!("uploaded primary key kid={}", response.kid);
        Ok(response.kid)
    }

    /// Revokes a key by id and removes it from the principal's key map.
    ///
    /// Revocation consumes a chain position on the server side; a
    /// subsequent [`ApiClient::next_position`] call reflects the new tip.
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] on a non-success envelope, transport or
    /// serialization errors otherwise.
    pub async fn revoke_key(
        &self,
        session: &mut Session,
        key_id: &str,
    ) -> Result<(), ProofKitError> {
        let form = [
            ("csrf_token", session.csrf_token().to_string()),
            ("kid", key_id.to_string()),
            ("revocation_type", "0".to_string()),
            ("session", session.session_id().to_string()),
        ];

        let url = self.command_url("key/revoke");
        let response: RevokeKeyResponse =
            self.request.send(self.request.post(&url).form(&form)).await?;

        session.rotate_token(response.csrf_token);
        session
            .user
            .public_keys
            .retain(|_, key| key.key_id != key_id);
        Ok(())
    }
}
