//! End-to-end workflow tests against a mock service: challenge/response
//! login, chain-anchored service binding, and the position-conflict path.

mod common;

use common::{client_for, login_alice, StubSigner};
use proofkit_core::{authenticate, bind_service, Signer as _};

const FIXED_CTIME: u64 = 1_396_478_094;

#[tokio::test]
async fn test_login_then_authenticate() {
    let mut server = mockito::Server::new_async().await;
    let client = client_for(&server);
    let mut session = login_alice(&mut server, &client).await;
    assert_eq!(session.csrf_token(), "tok_login");

    server
        .mock("POST", "/sig/post_auth.json")
        .match_body(mockito::Matcher::UrlEncoded(
            "csrf_token".into(),
            "tok_login".into(),
        ))
        .with_status(200)
        .with_body(
            r#"{"status":{"code":0,"name":"OK"},"auth_token":"feedface","csrf_token":"tok_auth"}"#,
        )
        .create_async()
        .await;

    let token = authenticate(&client, &mut session, &StubSigner, Some(FIXED_CTIME))
        .await
        .unwrap();

    assert_eq!(token, vec![0xFE, 0xED, 0xFA, 0xCE]);
    assert_eq!(session.csrf_token(), "tok_auth");

    drop(server);
}

#[tokio::test]
async fn test_binding_accepted_then_stale_resubmission_conflicts() {
    let mut server = mockito::Server::new_async().await;
    let client = client_for(&server);
    let mut session = login_alice(&mut server, &client).await;

    // The sequencer hands out position 5; it is a read, not a reservation.
    server
        .mock("GET", "/sig/next_seqno.json")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"status":{"code":0,"name":"OK"},"seqno":5,"prev":"abc123","csrf_token":"tok_seq"}"#,
        )
        .create_async()
        .await;

    let frozen = client
        .build_service_binding(&mut session, "twitter", "alicebird", Some(FIXED_CTIME))
        .await
        .unwrap();
    assert_eq!(frozen.statement().seqno(), Some(5));
    assert_eq!(frozen.statement().prev(), Some("abc123"));
    let signature = StubSigner.sign(frozen.payload(), "unused").unwrap();

    let accepted = server
        .mock("POST", "/sig/post.json")
        .with_status(200)
        .with_body(
            r#"{"status":{"code":0,"name":"OK"},"proof_text":"Verifying myself: alice","sig_id":"sig_05","proof_id":"proof_05","payload_hash":"beef05","csrf_token":"tok_post"}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let proof = client
        .post_service_binding(&mut session, &signature, "alicebird", "twitter")
        .await
        .unwrap();
    assert!(!proof.proof_id.is_empty());
    assert_eq!(proof.proof_id, "proof_05");
    accepted.assert_async().await;
    accepted.remove_async().await;

    // The chain tip moved to 5; the same signed bytes now name a stale
    // position and the server refuses them.
    server
        .mock("POST", "/sig/post.json")
        .with_status(200)
        .with_body(r#"{"status":{"code":409,"name":"WRONG_SEQNO","desc":"expected seqno 6"}}"#)
        .create_async()
        .await;

    let err = client
        .post_service_binding(&mut session, &signature, "alicebird", "twitter")
        .await
        .unwrap_err();
    assert!(err.is_chain_conflict());

    drop(server);
}

#[tokio::test]
async fn test_sequential_bindings_advance_the_chain() {
    let mut server = mockito::Server::new_async().await;
    let client = client_for(&server);
    let mut session = login_alice(&mut server, &client).await;

    let mut accepted_seqnos = Vec::new();
    for (seqno, prev) in [(5_u64, "abc123"), (6, "def456")] {
        let seq_mock = server
            .mock("GET", "/sig/next_seqno.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(format!(
                r#"{{"status":{{"code":0,"name":"OK"}},"seqno":{seqno},"prev":"{prev}","csrf_token":"tok_seq_{seqno}"}}"#
            ))
            .create_async()
            .await;
        let post_mock = server
            .mock("POST", "/sig/post.json")
            .with_status(200)
            .with_body(format!(
                r#"{{"status":{{"code":0,"name":"OK"}},"proof_text":"proof","sig_id":"sig_{seqno}","proof_id":"proof_{seqno}","payload_hash":"hash_{seqno}","csrf_token":"tok_post_{seqno}"}}"#
            ))
            .create_async()
            .await;

        let proof = bind_service(
            &client,
            &mut session,
            &StubSigner,
            "twitter",
            "alicebird",
            Some(FIXED_CTIME),
        )
        .await
        .unwrap();
        assert_eq!(proof.proof_id, format!("proof_{seqno}"));
        assert_eq!(session.csrf_token(), format!("tok_post_{seqno}"));
        accepted_seqnos.push(seqno);

        seq_mock.remove_async().await;
        post_mock.remove_async().await;
    }

    // Each accepted statement sat exactly one past the previous one.
    assert_eq!(accepted_seqnos, vec![5, 6]);

    drop(server);
}
