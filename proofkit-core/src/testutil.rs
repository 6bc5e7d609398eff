//! Fixtures shared across unit tests.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::ProofKitError;
use crate::session::Session;
use crate::signer::Signer;

/// Principal document for the test user "alice", with a primary key.
pub const ALICE: &str = r#"{
    "id":"94ef1e35789c6fa658b78e1b05eede00",
    "basics":{"username":"alice","ctime":1396400000,"mtime":1396400000},
    "profile":{"mtime":1396400000,"full_name":"Alice Example","location":"","bio":""},
    "public_keys":{"primary":{
        "kid":"0101f56ecf27564e2bfc9a54cd9d28ab12af",
        "key_fingerprint":"3b0c4de7d1658d1a5faec120ee4fba85107dad37",
        "bundle":"-----BEGIN PGP PUBLIC KEY BLOCK-----\n...\n-----END PGP PUBLIC KEY BLOCK-----",
        "ctime":1396400000,"mtime":1396400000}}
}"#;

/// Principal document for "bob", who has not uploaded a key.
pub const BOB_NO_KEY: &str =
    r#"{"id":"77aa1e35789c6fa658b78e1b05eede00","basics":{"username":"bob"},"public_keys":{}}"#;

/// Client pointed at a mock server.
pub fn client_for(server: &mockito::Server) -> ApiClient {
    ApiClient::new(Config::custom(&server.url(), "example.com"))
}

/// An authenticated session for "alice" built without a network call.
pub fn alice_session() -> Session {
    Session {
        session_id: "sess_1".to_string(),
        guest_id: "deadbeef".to_string(),
        uid: "94ef1e35789c6fa658b78e1b05eede00".to_string(),
        csrf_token: "tok_0".to_string(),
        user: serde_json::from_str(ALICE).expect("fixture parses"),
    }
}

/// A session for "bob", who has no primary key.
pub fn keyless_session() -> Session {
    Session {
        session_id: "sess_2".to_string(),
        guest_id: "deadbeef".to_string(),
        uid: "77aa1e35789c6fa658b78e1b05eede00".to_string(),
        csrf_token: "tok_0".to_string(),
        user: serde_json::from_str(BOB_NO_KEY).expect("fixture parses"),
    }
}

/// Signer that returns a fixed armored blob and records nothing.
pub struct StubSigner;

impl Signer for StubSigner {
    fn sign(&self, _payload: &[u8], _fingerprint: &str) -> Result<Vec<u8>, ProofKitError> {
        Ok(b"-----BEGIN PGP MESSAGE-----\nstub\n-----END PGP MESSAGE-----".to_vec())
    }
}
