use super::*;

/// Tests finding the member a Discord account is linked to.
///
/// Expected: Ok(Some(Member)) with the linked account populated
#[tokio::test]
async fn finds_linked_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::MemberFactory::new(db)
        .email("bob@example.com")
        .discord("111", "bob_d", Some("0002"))
        .build()
        .await?;

    let repo = MemberRepository::new(db);
    let member = repo.find_by_discord_id("111").await?.unwrap();
    let link = member.discord.unwrap();

    assert_eq!(member.email, "bob@example.com");
    assert_eq!(link.id, "111");
    assert_eq!(link.display_name(), "bob_d#0002");

    Ok(())
}

/// Tests that an unlinked Discord account resolves to nobody.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unlinked_account() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::member::create_member(db).await?;

    let repo = MemberRepository::new(db);

    assert!(repo.find_by_discord_id("111").await?.is_none());

    Ok(())
}
