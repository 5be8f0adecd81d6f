use super::*;

/// Tests finding a member by exact email.
///
/// Expected: Ok(Some(Member)) with the stored fields
#[tokio::test]
async fn finds_existing_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::MemberFactory::new(db)
        .email("alice@example.com")
        .full_name("Alice Example")
        .build()
        .await?;

    let repo = MemberRepository::new(db);
    let member = repo.find_by_email("alice@example.com").await?.unwrap();

    assert_eq!(member.email, "alice@example.com");
    assert_eq!(member.full_name, "Alice Example");
    assert!(member.is_approved());
    assert!(member.discord.is_none());

    Ok(())
}

/// Tests that email lookup does not ignore case.
///
/// Expected: Ok(None) for a differently cased address
#[tokio::test]
async fn email_match_is_exact() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::create_member_with_email(db, "alice@example.com").await?;

    let repo = MemberRepository::new(db);

    assert!(repo.find_by_email("Alice@Example.com").await?.is_none());

    Ok(())
}

/// Tests querying an email with no member.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MemberRepository::new(db);

    assert!(repo.find_by_email("nobody@example.com").await?.is_none());

    Ok(())
}
