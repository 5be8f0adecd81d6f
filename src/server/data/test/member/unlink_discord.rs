use super::*;
use sea_orm::EntityTrait;

/// Tests unlinking clears every Discord field and bumps `updated_at`.
///
/// Expected: Ok(Some(Member)) without a Discord link
#[tokio::test]
async fn clears_discord_fields() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let before = Utc::now() - Duration::hours(1);
    factory::member::MemberFactory::new(db)
        .email("bob@example.com")
        .discord("111", "bob_d", Some("0002"))
        .updated_at(before)
        .build()
        .await?;

    let repo = MemberRepository::new(db);
    let member = repo.unlink_discord("bob@example.com").await?.unwrap();

    assert!(member.discord.is_none());
    assert!(member.updated_at > before);

    let entity = entity::prelude::Member::find_by_id(member.id)
        .one(db)
        .await?
        .unwrap();
    assert!(entity.discord_id.is_none());
    assert!(entity.discord_username.is_none());
    assert!(entity.discord_discriminator.is_none());
    assert!(entity.discord_linked_at.is_none());

    Ok(())
}

/// Tests that the freed Discord account can be linked again.
///
/// Expected: Ok(true) when another member links the same account afterwards
#[tokio::test]
async fn frees_account_for_relinking() -> Result<(), DbErr> {
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
    repo.unlink_discord("bob@example.com").await?;

    let updated = repo
        .link_discord(&link_param("alice@example.com", "999", "alice_d"))
        .await?;

    assert!(updated);

    Ok(())
}

/// Tests unlinking an unknown email.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_member() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_member_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = MemberRepository::new(db);

    assert!(repo.unlink_discord("ghost@example.com").await?.is_none());

    Ok(())
}
