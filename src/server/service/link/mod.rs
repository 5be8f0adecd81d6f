//! Discord account-linking flow.
//!
//! The flow runs strictly in sequence per request: authorization URL, callback,
//! code exchange, profile fetch, member resolution, persistence and invite. Nothing is
//! persisted when a step before persistence fails.

use sea_orm::DatabaseConnection;

use crate::server::{
    config::DiscordConfig, service::link_state::LinkStateService, state::OAuth2Client,
};

pub mod authorize;
pub mod callback;
pub mod exchange;
pub mod resolve;

/// OAuth scopes requested when a member links their Discord account.
pub const LINK_SCOPES: [&str; 3] = ["identify", "email", "guilds.join"];

pub struct DiscordLinkService<'a> {
    pub db: &'a DatabaseConnection,
    pub http_client: &'a reqwest::Client,
    pub oauth_client: &'a OAuth2Client,
    pub discord: &'a DiscordConfig,
    pub link_state: &'a LinkStateService,
}

impl<'a> DiscordLinkService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        oauth_client: &'a OAuth2Client,
        discord: &'a DiscordConfig,
        link_state: &'a LinkStateService,
    ) -> Self {
        Self {
            db,
            http_client,
            oauth_client,
            discord,
            link_state,
        }
    }
}
