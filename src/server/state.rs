//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - HTTP client for Discord and identity provider requests
//! - OAuth2 client for Discord authorization URLs and code exchange
//! - Link state signer for the OAuth `state` parameter
//! - Discord and identity provider settings

use oauth2::basic::{BasicErrorResponseType, BasicTokenType};
use oauth2::{
    Client, EmptyExtraTokenFields, EndpointNotSet, EndpointSet, RevocationErrorResponseType,
    StandardErrorResponse, StandardRevocableToken, StandardTokenIntrospectionResponse,
    StandardTokenResponse,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use url::Url;

use crate::server::{
    config::{Config, DiscordConfig, IdentityConfig},
    error::{config::ConfigError, AppError},
    service::link_state::LinkStateService,
};

/// Type alias for the OAuth2 client with Discord authorization and token endpoints set.
pub(crate) type OAuth2Client = Client<
    StandardErrorResponse<BasicErrorResponseType>,
    StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardTokenIntrospectionResponse<EmptyExtraTokenFields, BasicTokenType>,
    StandardRevocableToken,
    StandardErrorResponse<RevocationErrorResponseType>,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: the database connection and HTTP client share
/// their pools, and configuration is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// HTTP client for outbound requests.
    ///
    /// Configured with redirects disabled and a request timeout. Shared by the
    /// Discord token exchange, profile fetch and identity provider lookups.
    pub http_client: reqwest::Client,

    /// OAuth2 client for the Discord authorization URL and code exchange.
    pub oauth_client: OAuth2Client,

    /// Signs and verifies the OAuth `state` parameter of the linking flow.
    pub link_state: LinkStateService,

    pub discord: Arc<DiscordConfig>,
    pub identity: Arc<IdentityConfig>,

    /// Dashboard settings page that receives linking outcomes.
    pub settings_url: Url,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `http_client` - HTTP client for external API requests
    /// - `oauth_client` - OAuth2 client for Discord authorization
    /// - `config` - Validated application configuration
    ///
    /// # Returns
    /// - `Ok(AppState)` - Initialized application state ready for use
    /// - `Err(AppError::ConfigErr)` - `APP_URL` does not form a valid settings URL
    pub fn new(
        db: DatabaseConnection,
        http_client: reqwest::Client,
        oauth_client: OAuth2Client,
        config: &Config,
    ) -> Result<Self, AppError> {
        let settings_url =
            Url::parse(&config.settings_url()).map_err(|e| ConfigError::InvalidEnvVar {
                name: "APP_URL".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            db,
            http_client,
            oauth_client,
            link_state: LinkStateService::new(&config.link_state_secret),
            discord: Arc::new(config.discord.clone()),
            identity: Arc::new(config.identity.clone()),
            settings_url,
        })
    }
}
