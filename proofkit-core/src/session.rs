use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretSlice};
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ProofKitError;
use crate::kdf;
use crate::salt::SaltMaterial;
use crate::user::Principal;

#[derive(Deserialize)]
struct LoginResponse {
    session: String,
    guest_id: String,
    uid: String,
    csrf_token: String,
    me: Principal,
}

/// An authenticated session.
///
/// The anti-forgery token is rotated by every successful server call; all
/// calls that rotate it take the session by `&mut`, so a stale token can
/// only be sent by cloning the session, never by accident within one.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) session_id: String,
    pub(crate) guest_id: String,
    pub(crate) uid: String,
    pub(crate) csrf_token: String,
    pub(crate) user: Principal,
}

impl Session {
    /// The server-issued session token.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The guest identifier assigned during salt exchange.
    #[must_use]
    pub fn guest_id(&self) -> &str {
        &self.guest_id
    }

    /// The authenticated user's identifier.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// The current anti-forgery token.
    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }

    /// The authenticated principal, as fetched at login and updated in
    /// place by key operations.
    #[must_use]
    pub const fn user(&self) -> &Principal {
        &self.user
    }

    pub(crate) fn rotate_token(&mut self, fresh: String) {
        log::debug!("csrf token rotated for uid={}", self.uid);
        self.csrf_token = fresh;
    }
}

impl ApiClient {
    /// Completes a login started by [`ApiClient::fetch_salt`].
    ///
    /// Derives the login HMAC locally (see [`crate::kdf`]) and posts it with
    /// the session nonce and anti-forgery token. The password is zeroized
    /// before the request goes out; `salt` is consumed and scrubbed on every
    /// path, so a failed attempt must restart from `fetch_salt`.
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] on bad credentials or any server-reported
    /// failure, transport or serialization errors otherwise.
    pub async fn login(
        &self,
        username: &str,
        password: SecretSlice<u8>,
        salt: SaltMaterial,
    ) -> Result<Session, ProofKitError> {
        let hmac = kdf::login_hmac(password.expose_secret(), &salt.salt, &salt.login_session)?;
        drop(password);

        let form = [
            ("email_or_username", username.to_string()),
            ("hmac_pwh", hex::encode(hmac.as_slice())),
            ("login_session", BASE64.encode(&salt.login_session)),
            ("csrf_token", salt.csrf_token.clone()),
        ];
        drop(salt);

        let url = self.command_url("login");
        let response: LoginResponse =
            self.request.send(self.request.post(&url).form(&form)).await?;

        log::debug!("logged in as uid={}", response.uid);
        Ok(Session {
            session_id: response.session,
            guest_id: response.guest_id,
            uid: response.uid,
            csrf_token: response.csrf_token,
            user: response.me,
        })
    }
}
