use std::collections::HashMap;

use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::ProofKitError;

/// Role label under which a principal's signing key is filed.
pub const PRIMARY_KEY_ROLE: &str = "primary";

/// A user identity as the service reports it: profile data plus the map
/// from key-role label to public-key metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Principal {
    /// Stable identifier of the user.
    pub id: String,
    /// Account basics.
    pub basics: Basics,
    /// Free-form profile data.
    #[serde(default)]
    pub profile: Profile,
    /// Public keys by role label (e.g. `"primary"`).
    #[serde(default)]
    pub public_keys: HashMap<String, PublicKeyInfo>,
}

/// Account basics for a principal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Basics {
    /// The account's username.
    pub username: String,
    /// Account creation time, unix seconds.
    #[serde(default)]
    pub ctime: i64,
    /// Last modification time, unix seconds.
    #[serde(default)]
    pub mtime: i64,
}

/// Profile data for a principal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Profile {
    /// Last profile update, unix seconds.
    #[serde(default)]
    pub mtime: i64,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Location string.
    #[serde(default)]
    pub location: String,
    /// Biography text.
    #[serde(default)]
    pub bio: String,
}

/// Metadata for one of a principal's public keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PublicKeyInfo {
    /// Server-assigned key identifier.
    #[serde(rename = "kid")]
    pub key_id: String,
    /// Key fingerprint, lowercase hex.
    #[serde(rename = "key_fingerprint", default)]
    pub fingerprint: String,
    /// Armored key bundle, when the server includes it.
    #[serde(default)]
    pub bundle: String,
    /// Key creation time, unix seconds.
    #[serde(default)]
    pub ctime: i64,
    /// Last modification time, unix seconds.
    #[serde(default)]
    pub mtime: i64,
}

impl Principal {
    /// The key filed under the `"primary"` role, if any.
    #[must_use]
    pub fn primary_key(&self) -> Option<&PublicKeyInfo> {
        self.public_keys.get(PRIMARY_KEY_ROLE)
    }

    pub(crate) fn require_primary_key(&self) -> Result<&PublicKeyInfo, ProofKitError> {
        self.primary_key().ok_or(ProofKitError::NoPublicKey)
    }
}

#[derive(Deserialize)]
struct LookupResponse {
    them: Principal,
}

impl ApiClient {
    /// Fetches the public profile and keys of an arbitrary user. Requires
    /// no session and may run concurrently with any session workflow.
    ///
    /// # Errors
    /// [`ProofKitError::Remote`] for unknown users, transport or
    /// serialization errors otherwise.
    pub async fn lookup_user(&self, username: &str) -> Result<Principal, ProofKitError> {
        let url = self.command_url("user/lookup");
        let response: LookupResponse = self
            .request
            .send(self.request.get(&url).query(&[("username", username)]))
            .await?;
        Ok(response.them)
    }
}
