//! Member data repository for database operations.
//!
//! This module provides the `MemberRepository` for reading approved-roster members and
//! writing their Discord link fields. Link writes are conditional updates so concurrent
//! attempts for the same member cannot overwrite each other.

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::member::{LinkDiscordParam, Member};

/// Repository providing database operations for members.
pub struct MemberRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MemberRepository<'a> {
    /// Creates a new MemberRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `MemberRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a member by exact email match.
    ///
    /// # Arguments
    /// - `email` - Member email, compared byte for byte
    ///
    /// # Returns
    /// - `Ok(Some(Member))` - Member found
    /// - `Ok(None)` - No member with that email
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Member>, DbErr> {
        let entity = entity::prelude::Member::find()
            .filter(entity::member::Column::Email.eq(email))
            .one(self.db)
            .await?;

        Ok(entity.map(Member::from_entity))
    }

    /// Finds a member by primary key.
    ///
    /// # Returns
    /// - `Ok(Some(Member))` - Member found
    /// - `Ok(None)` - No member with that id
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Member>, DbErr> {
        let entity = entity::prelude::Member::find_by_id(id).one(self.db).await?;

        Ok(entity.map(Member::from_entity))
    }

    /// Finds the member a Discord account is linked to.
    ///
    /// # Arguments
    /// - `discord_id` - Discord user snowflake as text
    ///
    /// # Returns
    /// - `Ok(Some(Member))` - Account is linked to this member
    /// - `Ok(None)` - Account is not linked
    /// - `Err(DbErr)` - Database error during query
    pub async fn find_by_discord_id(&self, discord_id: &str) -> Result<Option<Member>, DbErr> {
        let entity = entity::prelude::Member::find()
            .filter(entity::member::Column::DiscordId.eq(discord_id))
            .one(self.db)
            .await?;

        Ok(entity.map(Member::from_entity))
    }

    /// Writes the Discord link fields of a member.
    ///
    /// Only updates the row when the member is unlinked or already linked to the same
    /// Discord id (`WHERE email = ? AND (discord_id IS NULL OR discord_id = ?)`). Sets
    /// `discord_linked_at` and `updated_at` to the current time.
    ///
    /// # Arguments
    /// - `param` - Member email and Discord account to link
    ///
    /// # Returns
    /// - `Ok(true)` - Row updated
    /// - `Ok(false)` - No row matched; the member is missing or linked elsewhere
    /// - `Err(DbErr)` - Database error, including a unique violation on `discord_id`
    pub async fn link_discord(&self, param: &LinkDiscordParam) -> Result<bool, DbErr> {
        use entity::member::Column;

        let now = Utc::now();

        let result = entity::prelude::Member::update_many()
            .col_expr(Column::DiscordId, Expr::value(param.discord_id.clone()))
            .col_expr(Column::DiscordUsername, Expr::value(param.username.clone()))
            .col_expr(
                Column::DiscordDiscriminator,
                Expr::value(param.discriminator.clone()),
            )
            .col_expr(Column::DiscordLinkedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Email.eq(param.email.as_str()))
            .filter(
                Condition::any()
                    .add(Column::DiscordId.is_null())
                    .add(Column::DiscordId.eq(param.discord_id.as_str())),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Clears the Discord link fields of a member and bumps `updated_at`.
    ///
    /// Unlinking an unlinked member succeeds and still bumps `updated_at`.
    ///
    /// # Arguments
    /// - `email` - Member email
    ///
    /// # Returns
    /// - `Ok(Some(Member))` - Member after the update
    /// - `Ok(None)` - No member with that email
    /// - `Err(DbErr)` - Database error during update
    pub async fn unlink_discord(&self, email: &str) -> Result<Option<Member>, DbErr> {
        use entity::member::Column;

        let result = entity::prelude::Member::update_many()
            .col_expr(Column::DiscordId, Expr::value(Option::<String>::None))
            .col_expr(Column::DiscordUsername, Expr::value(Option::<String>::None))
            .col_expr(
                Column::DiscordDiscriminator,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                Column::DiscordLinkedAt,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Email.eq(email))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_email(email).await
    }
}
