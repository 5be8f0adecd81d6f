use super::*;

/// Tests linking an unlinked member.
///
/// Verifies all Discord fields, `discord_linked_at` and `updated_at` are written.
///
/// Expected: Ok(true) and the link stored
#[tokio::test]
async fn links_unlinked_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let before = Utc::now() - Duration::hours(1);
    factory::member::MemberFactory::new(db)
        .email("alice@example.com")
        .updated_at(before)
        .build()
        .await?;

    let repo = MemberRepository::new(db);
    let updated = repo
        .link_discord(&link_param("alice@example.com", "999", "alice_d"))
        .await?;

    assert!(updated);

    let member = repo.find_by_email("alice@example.com").await?.unwrap();
    let link = member.discord.unwrap();
    assert_eq!(link.id, "999");
    assert_eq!(link.username, "alice_d");
    assert_eq!(link.discriminator.as_deref(), Some("0001"));
    assert!(link.linked_at.is_some());
    assert!(member.updated_at > before);

    Ok(())
}

/// Tests the conditional update refuses to overwrite a different link.
///
/// Expected: Ok(false) and the stored Discord id unchanged
#[tokio::test]
async fn does_not_overwrite_different_link() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::MemberFactory::new(db)
        .email("bob@example.com")
        .discord("111", "bob_old", None)
        .build()
        .await?;

    let repo = MemberRepository::new(db);
    let updated = repo
        .link_discord(&link_param("bob@example.com", "222", "bob_new"))
        .await?;

    assert!(!updated);

    let member = repo.find_by_email("bob@example.com").await?.unwrap();
    let link = member.discord.unwrap();
    assert_eq!(link.id, "111");
    assert_eq!(link.username, "bob_old");

    Ok(())
}

/// Tests linking an email with no member row.
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_for_missing_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MemberRepository::new(db);
    let updated = repo
        .link_discord(&link_param("ghost@example.com", "999", "alice_d"))
        .await?;

    assert!(!updated);

    Ok(())
}

/// Tests that one Discord account cannot be linked to two members.
///
/// Expected: Err(DbErr) reporting a unique constraint violation
#[tokio::test]
async fn rejects_account_linked_to_another_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::MemberFactory::new(db)
        .email("bob@example.com")
        .discord("999", "alice_d", None)
        .build()
        .await?;
    factory::member::create_member_with_email(db, "alice@example.com").await?;

    let repo = MemberRepository::new(db);
    let result = repo
        .link_discord(&link_param("alice@example.com", "999", "alice_d"))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ));

    let alice = repo.find_by_email("alice@example.com").await?.unwrap();
    assert!(alice.discord.is_none());

    Ok(())
}
