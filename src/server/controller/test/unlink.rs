use super::*;

/// Tests unlinking the signed-in member.
///
/// Expected: 200 and every Discord field cleared
#[tokio::test]
async fn unlinks_signed_in_member() {
    let mut test = TestApp::new().await;
    factory::member::MemberFactory::new(&test.db)
        .email("bob@example.com")
        .discord("111", "bob_d", Some("0002"))
        .build()
        .await
        .unwrap();
    test.sign_in("bob@example.com").await;

    let response = test
        .post_json(
            "/api/discord/unlink",
            json!({ "memberEmail": "bob@example.com" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["success"], true);

    let bob = test.member("bob@example.com").await;
    assert!(bob.discord_id.is_none());
    assert!(bob.discord_username.is_none());
    assert!(bob.discord_discriminator.is_none());
    assert!(bob.discord_linked_at.is_none());
}

/// Tests unlinking another member.
///
/// Expected: 403 Forbidden, link untouched
#[tokio::test]
async fn rejects_unlinking_other_member() {
    let mut test = TestApp::new().await;
    factory::member::MemberFactory::new(&test.db)
        .email("bob@example.com")
        .discord("111", "bob_d", None)
        .build()
        .await
        .unwrap();
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.sign_in("alice@example.com").await;

    let response = test
        .post_json(
            "/api/discord/unlink",
            json!({ "memberEmail": "bob@example.com" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        test.member("bob@example.com").await.discord_id.as_deref(),
        Some("111")
    );
}

/// Tests unlinking without a session.
///
/// Expected: 401 Unauthorized
#[tokio::test]
async fn requires_signed_in_member() {
    let mut test = TestApp::new().await;

    let response = test
        .post_json(
            "/api/discord/unlink",
            json!({ "memberEmail": "bob@example.com" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
