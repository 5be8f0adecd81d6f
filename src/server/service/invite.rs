//! Community server invite generation.

use url::form_urlencoded;

use crate::server::config::DiscordConfig;

/// Permissions integer requested for the community bot install.
const INVITE_PERMISSIONS: &str = "8";
const INVITE_SCOPES: &str = "bot applications.commands guilds.join";

pub struct InviteService<'a> {
    discord: &'a DiscordConfig,
}

impl<'a> InviteService<'a> {
    pub fn new(discord: &'a DiscordConfig) -> Self {
        Self { discord }
    }

    /// Builds the community server invite URL.
    ///
    /// The URL is derived entirely from configuration, so the same configuration always
    /// yields the same URL.
    ///
    /// # Returns
    /// - `Some(String)` - Invite URL
    /// - `None` - `DISCORD_GUILD_ID` is not configured
    pub fn invite_url(&self) -> Option<String> {
        let guild_id = self.discord.guild_id.as_deref()?;

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.discord.client_id)
            .append_pair("permissions", INVITE_PERMISSIONS)
            .append_pair("guild_id", guild_id)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.discord.redirect_url)
            .append_pair("integration_type", "0")
            .append_pair("scope", INVITE_SCOPES)
            .finish();

        Some(format!("{}?{}", self.discord.auth_url, query))
    }
}
