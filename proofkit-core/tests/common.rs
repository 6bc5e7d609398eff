//! Common test utilities shared across integration tests.

use proofkit_core::{ApiClient, Config, ProofKitError, Session, Signer};
use secrecy::SecretSlice;

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

/// Signer that returns a fixed armored blob without touching key material.
pub struct StubSigner;

impl Signer for StubSigner {
    fn sign(&self, _payload: &[u8], _fingerprint: &str) -> Result<Vec<u8>, ProofKitError> {
        Ok(b"-----BEGIN PGP MESSAGE-----\nstub\n-----END PGP MESSAGE-----".to_vec())
    }
}

/// Client pointed at a mock server.
pub fn client_for(server: &mockito::Server) -> ApiClient {
    ApiClient::new(Config::custom(&server.url(), "example.com"))
}

/// Mounts getsalt + login mocks and runs the full challenge/response login
/// for "alice" with the password "correct horse".
pub async fn login_alice(server: &mut mockito::Server, client: &ApiClient) -> Session {
    server
        .mock("GET", "/getsalt.json")
        .match_query(mockito::Matcher::UrlEncoded(
            "email_or_username".into(),
            "alice".into(),
        ))
        .with_status(200)
        .with_body(
            r#"{"status":{"code":0,"name":"OK"},"guest_id":"deadbeef","salt":"73616c74","login_session":"MTIzNA==","pwh_version":3,"csrf_token":"tok_salt"}"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/login.json")
        .match_body(mockito::Matcher::UrlEncoded(
            "csrf_token".into(),
            "tok_salt".into(),
        ))
        .with_status(200)
        .with_body(format!(
            r#"{{"status":{{"code":0,"name":"OK"}},"session":"sess_1","guest_id":"deadbeef","uid":"94ef1e35789c6fa658b78e1b05eede00","csrf_token":"tok_login","me":{ALICE}}}"#
        ))
        .create_async()
        .await;

    let salt = client.fetch_salt("alice").await.expect("salt exchange");
    let password = SecretSlice::from(b"correct horse".to_vec());
    client
        .login("alice", password, salt)
        .await
        .expect("login succeeds")
}
