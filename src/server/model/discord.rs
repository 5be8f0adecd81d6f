//! Discord profile returned by `users/@me`.

use serenity::all::User as DiscordUser;

use crate::server::model::member::{display_name, LinkDiscordParam};

/// The external account fetched during a linking attempt. Never persisted as its own row.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscordProfile {
    pub id: String,
    pub username: String,
    /// Four digit legacy tag, zero padded. `None` for migrated accounts.
    pub discriminator: Option<String>,
    /// Email declared on the account. Only present with the `email` scope.
    pub email: Option<String>,
    /// Whether Discord has verified `email`.
    pub verified: bool,
}

impl DiscordProfile {
    /// Converts serenity's user model into the linking profile.
    pub fn from_user(user: DiscordUser) -> Self {
        Self {
            id: user.id.get().to_string(),
            username: user.name,
            discriminator: user.discriminator.map(|tag| format!("{:04}", tag.get())),
            email: user.email.filter(|email| !email.is_empty()),
            verified: user.verified.unwrap_or(false),
        }
    }

    /// Email usable for member lookup: present and verified by Discord.
    pub fn verified_email(&self) -> Option<&str> {
        match (&self.email, self.verified) {
            (Some(email), true) => Some(email),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        display_name(&self.username, self.discriminator.as_deref())
    }

    /// Link parameters for attaching this account to the member with `email`.
    pub fn into_link_param(self, email: String) -> LinkDiscordParam {
        LinkDiscordParam {
            email,
            discord_id: self.id,
            username: self.username,
            discriminator: self.discriminator,
        }
    }
}
