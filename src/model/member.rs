use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub email: String,
    pub full_name: String,
    /// Application status: `pending`, `approved` or `rejected`.
    pub status: String,
    /// Linked Discord account, if any.
    pub discord: Option<DiscordLinkDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscordLinkDto {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    /// `username#discriminator`, or just `username` for accounts without a tag.
    pub display_name: String,
    pub linked_at: Option<DateTime<Utc>>,
}
