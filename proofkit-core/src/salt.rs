use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::client::ApiClient;
use crate::error::ProofKitError;

#[derive(Deserialize)]
struct GetSaltResponse {
    guest_id: String,
    salt: String,
    login_session: String,
    pwh_version: u32,
    csrf_token: String,
}

/// Single-use login material issued by the service for one login attempt.
///
/// Holds the decoded salt and login session nonce alongside the initial
/// anti-forgery token. The byte fields are scrubbed when the value drops,
/// on every path; [`ApiClient::login`] consumes it by value, so a
/// `SaltMaterial` can never be replayed into a second attempt.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SaltMaterial {
    pub(crate) guest_id: Vec<u8>,
    pub(crate) salt: Vec<u8>,
    pub(crate) login_session: Vec<u8>,
    #[zeroize(skip)]
    pub(crate) pwh_version: u32,
    pub(crate) csrf_token: String,
}

impl SaltMaterial {
    /// Version of the password-hash scheme the server expects.
    #[must_use]
    pub const fn pwh_version(&self) -> u32 {
        self.pwh_version
    }

    fn from_response(response: GetSaltResponse) -> Result<Self, ProofKitError> {
        // Populated field by field so that a decode failure drops (and
        // scrubs) whatever was already filled in.
        let mut material = Self {
            guest_id: Vec::new(),
            salt: Vec::new(),
            login_session: Vec::new(),
            pwh_version: response.pwh_version,
            csrf_token: response.csrf_token,
        };
        material.guest_id = hex::decode(&response.guest_id)
            .map_err(|err| ProofKitError::Serialization(format!("guest_id: {err}")))?;
        material.salt = hex::decode(&response.salt)
            .map_err(|err| ProofKitError::Serialization(format!("salt: {err}")))?;
        material.login_session = BASE64
            .decode(&response.login_session)
            .map_err(|err| ProofKitError::Serialization(format!("login_session: {err}")))?;
        Ok(material)
    }
}

impl std::fmt::Debug for SaltMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaltMaterial")
            .field("pwh_version", &self.pwh_version)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl ApiClient {
    /// Retrieves salt and login session nonce for `username`. Read-only;
    /// the result is valid for exactly one [`ApiClient::login`] call.
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] when the service rejects the username,
    /// transport or serialization errors otherwise.
    pub async fn fetch_salt(&self, username: &str) -> Result<SaltMaterial, ProofKitError> {
        let url = self.command_url("getsalt");
        let response: GetSaltResponse = self
            .request
            .send(
                self.request
                    .get(&url)
                    .query(&[("email_or_username", username)]),
            )
            .await?;
        SaltMaterial::from_response(response)
    }
}
