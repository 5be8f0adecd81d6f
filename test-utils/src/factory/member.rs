//! Member factory for creating test roster entries.
//!
//! This module provides factory methods for creating member entities with sensible
//! defaults, reducing boilerplate in tests. The factory supports customization
//! through a builder pattern.

use crate::factory::helpers::next_id;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test members with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::member::MemberFactory;
///
/// let member = MemberFactory::new(&db)
///     .email("alice@example.com")
///     .status("pending")
///     .build()
///     .await?;
/// ```
pub struct MemberFactory<'a> {
    db: &'a DatabaseConnection,
    email: String,
    full_name: String,
    status: String,
    discord_id: Option<String>,
    discord_username: Option<String>,
    discord_discriminator: Option<String>,
    updated_at: DateTime<Utc>,
}

impl<'a> MemberFactory<'a> {
    /// Creates a new MemberFactory with default values.
    ///
    /// Defaults:
    /// - email: `"member{id}@example.com"` where id is auto-incremented
    /// - full_name: `"Member {id}"`
    /// - status: `"approved"`
    /// - no linked Discord account
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            email: format!("member{}@example.com", id),
            full_name: format!("Member {}", id),
            status: "approved".to_string(),
            discord_id: None,
            discord_username: None,
            discord_discriminator: None,
            updated_at: Utc::now(),
        }
    }

    /// Sets the email for the member.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the full name for the member.
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Sets the application status (`pending`, `approved` or `rejected`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Marks the member as already linked to a Discord account.
    ///
    /// # Arguments
    /// - `id` - Discord user ID as string
    /// - `username` - Discord username
    /// - `discriminator` - Legacy four digit tag, if any
    pub fn discord(
        mut self,
        id: impl Into<String>,
        username: impl Into<String>,
        discriminator: Option<&str>,
    ) -> Self {
        self.discord_id = Some(id.into());
        self.discord_username = Some(username.into());
        self.discord_discriminator = discriminator.map(str::to_string);
        self
    }

    /// Sets the `updated_at` timestamp, useful for asserting a row was not rewritten.
    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    /// Builds and inserts the member entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::member::Model)` - Created member entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::member::Model, DbErr> {
        let linked_at = self.discord_id.as_ref().map(|_| self.updated_at);
        entity::member::ActiveModel {
            email: ActiveValue::Set(self.email),
            full_name: ActiveValue::Set(self.full_name),
            status: ActiveValue::Set(self.status),
            discord_id: ActiveValue::Set(self.discord_id),
            discord_username: ActiveValue::Set(self.discord_username),
            discord_discriminator: ActiveValue::Set(self.discord_discriminator),
            discord_linked_at: ActiveValue::Set(linked_at),
            created_at: ActiveValue::Set(self.updated_at),
            updated_at: ActiveValue::Set(self.updated_at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an approved, unlinked member with default values.
///
/// Shorthand for `MemberFactory::new(db).build().await`.
pub async fn create_member(db: &DatabaseConnection) -> Result<entity::member::Model, DbErr> {
    MemberFactory::new(db).build().await
}

/// Creates an approved, unlinked member with a specific email.
///
/// Shorthand for `MemberFactory::new(db).email(email).build().await`.
pub async fn create_member_with_email(
    db: &DatabaseConnection,
    email: impl Into<String>,
) -> Result<entity::member::Model, DbErr> {
    MemberFactory::new(db).email(email).build().await
}
