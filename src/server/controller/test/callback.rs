use super::*;

/// Tests a provider error is classified and nothing is called upstream.
///
/// Expected: 303 to settings with `discord_error=access_denied`, zero Discord calls
#[tokio::test]
async fn provider_error_redirects_without_outbound_calls() {
    let mut test = TestApp::new().await;

    let response = test
        .callback("error=access_denied&error_description=The+resource+owner+denied+the+request")
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let url = location(&response);
    let params = redirect_params(&response);
    assert_eq!(url.path(), "/dashboard/settings");
    assert_eq!(params["discord_error"], "access_denied");
    assert_eq!(params["details"], "The resource owner denied the request");
    assert_eq!(test.upstream.discord_calls(), 0);
}

/// Tests a provider error wins even when a code is also present.
///
/// Expected: `discord_error=server_error`, zero Discord calls
#[tokio::test]
async fn provider_error_takes_precedence_over_code() {
    let mut test = TestApp::new().await;

    let response = test.callback("error=server_error&code=abc123").await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "server_error");
    assert!(params.contains_key("details"));
    assert_eq!(test.upstream.discord_calls(), 0);
}

/// Tests an unrecognized provider error is reported as `other`.
///
/// Expected: `discord_error=other`
#[tokio::test]
async fn unknown_provider_error_is_other() {
    let mut test = TestApp::new().await;

    let response = test.callback("error=interaction_required").await;

    assert_eq!(redirect_params(&response)["discord_error"], "other");
    assert_eq!(test.upstream.discord_calls(), 0);
}

/// Tests a callback with neither code nor error.
///
/// Expected: `discord_error=no_code`, zero Discord calls
#[tokio::test]
async fn missing_code_redirects_with_no_code() {
    let mut test = TestApp::new().await;

    let response = test.callback("state=whatever").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(redirect_params(&response)["discord_error"], "no_code");
    assert_eq!(test.upstream.discord_calls(), 0);
}

/// Tests an unparseable query string is treated as carrying no code.
///
/// Expected: `discord_error=no_code`, zero Discord calls
#[tokio::test]
async fn malformed_query_redirects_with_no_code() {
    let mut test = TestApp::new().await;

    let response = test.callback("code=abc&code=def").await;

    assert_eq!(redirect_params(&response)["discord_error"], "no_code");
    assert_eq!(test.upstream.discord_calls(), 0);
}

/// Tests the end-to-end happy path.
///
/// Alice signs in, starts linking, and Discord calls back with code `abc123`. The token
/// endpoint returns `tok` and the profile is `999` / `alice_d` / `0001`.
///
/// Expected: `discord_success=true` with an invite, and Alice linked to `999`
#[tokio::test]
async fn links_member_end_to_end() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.sign_in("alice@example.com").await;

    let authorize = test.get("/api/discord/authorize").await;
    let discord_params: HashMap<String, String> =
        location(&authorize).query_pairs().into_owned().collect();
    let state = url::form_urlencoded::byte_serialize(discord_params["state"].as_bytes())
        .collect::<String>();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let params = redirect_params(&response);
    assert_eq!(params["discord_success"], "true");
    assert!(!params.contains_key("already_linked"));
    assert!(params["invite_url"].contains("guild_id=123456789012345678"));

    let form = test.upstream.last_token_form().unwrap();
    assert_eq!(form["code"], "abc123");
    assert_eq!(form["grant_type"], "authorization_code");
    assert_eq!(form["client_id"], "client-id");
    assert_eq!(form["client_secret"], "client-secret");
    assert_eq!(form["redirect_uri"], "http://app.test/api/discord/callback");
    assert_eq!(
        test.upstream.last_profile_authorization().as_deref(),
        Some("Bearer tok")
    );

    let alice = test.member("alice@example.com").await;
    assert_eq!(alice.discord_id.as_deref(), Some("999"));
    assert_eq!(alice.discord_username.as_deref(), Some("alice_d"));
    assert_eq!(alice.discord_discriminator.as_deref(), Some("0001"));
    assert!(alice.discord_linked_at.is_some());
}

/// Tests relinking the same Discord account is an idempotent success.
///
/// Expected: `discord_success=true&already_linked=true`, `updated_at` unchanged
#[tokio::test]
async fn relinking_same_account_reports_already_linked() {
    let mut test = TestApp::new().await;
    factory::member::MemberFactory::new(&test.db)
        .email("alice@example.com")
        .discord("999", "alice_d", Some("0001"))
        .build()
        .await
        .unwrap();
    let before = test.member("alice@example.com").await;
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_success"], "true");
    assert_eq!(params["already_linked"], "true");

    let after = test.member("alice@example.com").await;
    assert_eq!(after.updated_at, before.updated_at);
    assert_eq!(after.discord_linked_at, before.discord_linked_at);
}

/// Tests a member linked to another account is reported as a conflict.
///
/// Bob is linked to `111`; Discord returns profile `222`.
///
/// Expected: `discord_error=conflict` with the existing username, stored id stays `111`
#[tokio::test]
async fn conflicting_link_leaves_stored_account_untouched() {
    let mut test = TestApp::new().await;
    factory::member::MemberFactory::new(&test.db)
        .email("bob@example.com")
        .discord("111", "bob_old", None)
        .build()
        .await
        .unwrap();
    test.upstream.set_profile_response(
        200,
        fixture::discord::user("222", "bob_new", "0", Some("bob@discord.example"), true),
    );
    let state = test.state.link_state.issue("bob@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "conflict");
    assert_eq!(params["details"], "bob_old");

    let bob = test.member("bob@example.com").await;
    assert_eq!(bob.discord_id.as_deref(), Some("111"));
    assert_eq!(bob.discord_username.as_deref(), Some("bob_old"));
}

/// Tests a valid state wins over a verified profile email of another member.
///
/// Expected: the state's member is linked, the profile email's member is not
#[tokio::test]
async fn valid_state_beats_profile_email() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    factory::member::create_member_with_email(&test.db, "carol@example.com")
        .await
        .unwrap();
    test.upstream.set_profile_response(
        200,
        fixture::discord::verified_user("carol@example.com"),
    );
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(redirect_params(&response)["discord_success"], "true");
    assert_eq!(
        test.member("alice@example.com").await.discord_id.as_deref(),
        Some("999")
    );
    assert!(test.member("carol@example.com").await.discord_id.is_none());
}

/// Tests an unverified profile email never resolves a member.
///
/// Expected: `discord_error=no_user_email&reason=email_unverified`, nobody linked
#[tokio::test]
async fn unverified_profile_email_never_resolves() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.upstream.set_profile_response(
        200,
        fixture::discord::user("999", "alice_d", "0001", Some("alice@example.com"), false),
    );

    let response = test.callback("code=abc123").await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "no_user_email");
    assert_eq!(params["reason"], "email_unverified");
    assert_eq!(params["discord_email"], "alice@example.com");
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests the verified profile email fallback when no state is sent.
///
/// Expected: `discord_success=true`, member matched by email linked
#[tokio::test]
async fn verified_profile_email_resolves_without_state() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@discord.example")
        .await
        .unwrap();

    let response = test.callback("code=abc123").await;

    assert_eq!(redirect_params(&response)["discord_success"], "true");
    assert_eq!(
        test.member("alice@discord.example")
            .await
            .discord_id
            .as_deref(),
        Some("999")
    );
}

/// Tests a verified profile email with no matching member.
///
/// Expected: `discord_error=no_user_email&reason=no_matching_member`
#[tokio::test]
async fn verified_email_without_member_reports_no_matching_member() {
    let mut test = TestApp::new().await;

    let response = test.callback("code=abc123").await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "no_user_email");
    assert_eq!(params["reason"], "no_matching_member");
    assert_eq!(params["discord_email"], "alice@discord.example");
}

/// Tests a tampered state with a profile lacking an email.
///
/// Expected: `discord_error=no_user_email&reason=state_invalid`
#[tokio::test]
async fn invalid_state_without_profile_email_reports_state_invalid() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.upstream.set_profile_response(
        200,
        fixture::discord::user("999", "alice_d", "0001", None, false),
    );

    let response = test
        .callback("code=abc123&state=alice%40example.com")
        .await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "no_user_email");
    assert_eq!(params["reason"], "state_invalid");
    assert!(!params.contains_key("discord_email"));
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a rejected authorization code.
///
/// Expected: `discord_error=token_exchange_failed`, no profile fetch, no mutation
#[tokio::test]
async fn token_endpoint_error_reports_exchange_failure() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.upstream
        .set_token_response(400, fixture::discord::invalid_grant());
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(
        redirect_params(&response)["discord_error"],
        "token_exchange_failed"
    );
    assert_eq!(test.upstream.discord_calls(), 1);
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a 2xx token response without an access token.
///
/// Expected: `discord_error=no_access_token`
#[tokio::test]
async fn token_response_without_access_token() {
    let mut test = TestApp::new().await;
    test.upstream
        .set_token_response(200, json!({ "token_type": "Bearer", "access_token": "" }));

    let response = test.callback("code=abc123").await;

    assert_eq!(redirect_params(&response)["discord_error"], "no_access_token");
    assert_eq!(test.upstream.discord_calls(), 1);
}

/// Tests a failing profile endpoint.
///
/// Expected: `discord_error=user_info_failed`, no mutation
#[tokio::test]
async fn profile_error_reports_user_info_failure() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.upstream
        .set_profile_response(401, json!({ "message": "401: Unauthorized", "code": 0 }));
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(redirect_params(&response)["discord_error"], "user_info_failed");
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests linking a member whose application is still pending.
///
/// Expected: `discord_error=link_failed&reason=not_approved`, nothing written
#[tokio::test]
async fn pending_member_cannot_link() {
    let mut test = TestApp::new().await;
    factory::member::MemberFactory::new(&test.db)
        .email("alice@example.com")
        .status("pending")
        .build()
        .await
        .unwrap();
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "link_failed");
    assert_eq!(params["reason"], "not_approved");
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a valid state for an email with no member record.
///
/// Expected: `discord_error=link_failed&reason=member_not_found`
#[tokio::test]
async fn state_for_unknown_member_reports_member_not_found() {
    let mut test = TestApp::new().await;
    let state = test.state.link_state.issue("ghost@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "link_failed");
    assert_eq!(params["reason"], "member_not_found");
}

/// Tests a Discord account already linked to a different member.
///
/// Expected: `discord_error=account_in_use`, neither member changed
#[tokio::test]
async fn account_linked_elsewhere_reports_account_in_use() {
    let mut test = TestApp::new().await;
    factory::member::MemberFactory::new(&test.db)
        .email("bob@example.com")
        .discord("999", "alice_d", Some("0001"))
        .build()
        .await
        .unwrap();
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(redirect_params(&response)["discord_error"], "account_in_use");
    assert!(test.member("alice@example.com").await.discord_id.is_none());
    assert_eq!(
        test.member("bob@example.com").await.discord_id.as_deref(),
        Some("999")
    );
}

/// Tests linking succeeds without a configured community server.
///
/// Expected: `discord_success=true&invite_notice=config_missing`, no `invite_url`
#[tokio::test]
async fn missing_guild_links_with_invite_notice() {
    let mut test = TestApp::with_config(|config| config.discord.guild_id = None).await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    let params = redirect_params(&response);
    assert_eq!(params["discord_success"], "true");
    assert_eq!(params["invite_notice"], "config_missing");
    assert!(!params.contains_key("invite_url"));
    assert_eq!(
        test.member("alice@example.com").await.discord_id.as_deref(),
        Some("999")
    );
}

/// Tests a token endpoint that cannot be reached.
///
/// Expected: `discord_error=token_exchange_failed`, no profile fetch, no mutation
#[tokio::test]
async fn unreachable_token_endpoint_reports_exchange_failure() {
    let token_url = format!("{}/oauth2/token", closed_port_url().await);
    let mut test = TestApp::with_config(|config| config.discord.token_url = token_url).await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        redirect_params(&response)["discord_error"],
        "token_exchange_failed"
    );
    assert_eq!(test.upstream.discord_calls(), 0);
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a 2xx token response whose body is not JSON.
///
/// Expected: `discord_error=token_exchange_failed`, no profile fetch
#[tokio::test]
async fn unparseable_token_body_reports_exchange_failure() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.upstream.set_token_body(200, "<html>upstream proxy</html>");
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(
        redirect_params(&response)["discord_error"],
        "token_exchange_failed"
    );
    assert_eq!(test.upstream.discord_calls(), 1);
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a 2xx token response that omits the access token field.
///
/// Expected: `discord_error=no_access_token`, no profile fetch
#[tokio::test]
async fn token_response_missing_access_token_field() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.upstream.set_token_response(
        200,
        json!({ "token_type": "Bearer", "scope": "identify email guilds.join" }),
    );
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(redirect_params(&response)["discord_error"], "no_access_token");
    assert_eq!(test.upstream.discord_calls(), 1);
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a profile endpoint that cannot be reached.
///
/// Expected: `discord_error=user_info_failed` after the token exchange, no mutation
#[tokio::test]
async fn unreachable_profile_endpoint_reports_user_info_failure() {
    let api_url = format!("{}/api", closed_port_url().await);
    let mut test = TestApp::with_config(|config| config.discord.api_url = api_url).await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(redirect_params(&response)["discord_error"], "user_info_failed");
    assert_eq!(test.upstream.discord_calls(), 1);
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a 2xx profile response whose body is not a Discord user.
///
/// Expected: `discord_error=user_info_failed`, no mutation
#[tokio::test]
async fn unparseable_profile_body_reports_user_info_failure() {
    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.upstream.set_profile_body(200, "{\"id\": ");
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(redirect_params(&response)["discord_error"], "user_info_failed");
    assert_eq!(test.upstream.discord_calls(), 2);
    assert!(test.member("alice@example.com").await.discord_id.is_none());
}

/// Tests a database failure while writing the link.
///
/// A trigger rejects every update of the member row.
///
/// Expected: `discord_error=link_failed`, no database text in the redirect, row untouched
#[tokio::test]
async fn storage_failure_reports_link_failed_without_leaking_error() {
    use sea_orm::ConnectionTrait;

    let mut test = TestApp::new().await;
    factory::member::create_member_with_email(&test.db, "alice@example.com")
        .await
        .unwrap();
    test.db
        .execute_unprepared(
            "CREATE TRIGGER reject_member_update BEFORE UPDATE ON member \
             BEGIN SELECT RAISE(ABORT, 'disk quota exceeded'); END;",
        )
        .await
        .unwrap();
    let before = test.member("alice@example.com").await;
    let state = test.state.link_state.issue("alice@example.com").unwrap();

    let response = test
        .callback(&format!("code=abc123&state={}", state))
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let url = location(&response);
    let params = redirect_params(&response);
    assert_eq!(params["discord_error"], "link_failed");
    assert!(!params.contains_key("details"));
    assert!(!url.as_str().contains("quota"));
    assert!(!url.as_str().to_lowercase().contains("trigger"));
    assert_eq!(test.member("alice@example.com").await, before);
}
