use sea_orm::entity::prelude::*;

/// Approved-member roster row, including the optional linked Discord account.
///
/// Rows are created by the application review process; this service only
/// reads them and mutates the `discord_*` columns.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "member")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    /// One of `pending`, `approved` or `rejected`.
    pub status: String,
    #[sea_orm(unique)]
    pub discord_id: Option<String>,
    pub discord_username: Option<String>,
    pub discord_discriminator: Option<String>,
    pub discord_linked_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
