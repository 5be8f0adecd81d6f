//! Member domain models and parameters.
//!
//! Members are created externally when an application is reviewed; this service only
//! reads them and manages the optional linked Discord account.

use chrono::{DateTime, Utc};

use crate::model::member::{DiscordLinkDto, MemberDto};

/// Application review status of a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    /// Value not recognized by this service. Treated as not approved.
    Unknown(String),
}

impl ApprovalStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Unknown(value) => value,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Discord account linked to a member.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscordLink {
    /// Discord user snowflake, kept as text.
    pub id: String,
    pub username: String,
    /// Legacy four digit tag. `None` for accounts on the new username system.
    pub discriminator: Option<String>,
    pub linked_at: Option<DateTime<Utc>>,
}

impl DiscordLink {
    /// `username#discriminator`, or just the username when there is no tag.
    pub fn display_name(&self) -> String {
        display_name(&self.username, self.discriminator.as_deref())
    }
}

/// Formats a Discord account name the way Discord historically displayed it.
///
/// Discriminators of `0` mark migrated accounts without a tag.
pub fn display_name(username: &str, discriminator: Option<&str>) -> String {
    match discriminator {
        Some(tag) if !tag.is_empty() && !tag.trim_start_matches('0').is_empty() => {
            format!("{}#{}", username, tag)
        }
        _ => username.to_string(),
    }
}

/// Approved-roster member with their optional Discord link.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub status: ApprovalStatus,
    pub discord: Option<DiscordLink>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Converts an entity model to a member domain model at the repository boundary.
    ///
    /// A row with a `discord_id` but no username falls back to the id as the username.
    pub fn from_entity(entity: entity::member::Model) -> Self {
        let discord = entity.discord_id.map(|id| DiscordLink {
            username: entity.discord_username.unwrap_or_else(|| id.clone()),
            id,
            discriminator: entity.discord_discriminator,
            linked_at: entity.discord_linked_at,
        });

        Self {
            id: entity.id,
            email: entity.email,
            full_name: entity.full_name,
            status: ApprovalStatus::parse(&entity.status),
            discord,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status.is_approved()
    }

    /// Converts the member domain model to a DTO for API responses.
    pub fn into_dto(self) -> MemberDto {
        MemberDto {
            email: self.email,
            full_name: self.full_name,
            status: self.status.as_str().to_string(),
            discord: self.discord.map(|link| DiscordLinkDto {
                display_name: link.display_name(),
                id: link.id,
                username: link.username,
                discriminator: link.discriminator,
                linked_at: link.linked_at,
            }),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Parameters for linking a Discord account to a member.
#[derive(Debug, Clone)]
pub struct LinkDiscordParam {
    /// Email of the member to link.
    pub email: String,
    pub discord_id: String,
    pub username: String,
    pub discriminator: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_is_not_approved() {
        let status = ApprovalStatus::parse("waitlisted");

        assert!(!status.is_approved());
        assert_eq!(status.as_str(), "waitlisted");
    }

    #[test]
    fn display_name_includes_legacy_tag() {
        assert_eq!(display_name("alice_d", Some("0001")), "alice_d#0001");
    }

    #[test]
    fn display_name_skips_zero_or_missing_tag() {
        assert_eq!(display_name("alice_d", Some("0")), "alice_d");
        assert_eq!(display_name("alice_d", Some("0000")), "alice_d");
        assert_eq!(display_name("alice_d", None), "alice_d");
        assert_eq!(display_name("alice_d", Some("")), "alice_d");
    }

    #[test]
    fn display_name_keeps_tag_with_leading_zeros() {
        assert_eq!(display_name("alice_d", Some("0100")), "alice_d#0100");
    }
}
