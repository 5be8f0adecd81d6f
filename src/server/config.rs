//! Environment-based application configuration.
//!
//! Configuration is read once at startup and validated before any listener is bound,
//! so handlers can rely on every required value being present and well-formed.

use url::Url;

use crate::server::error::config::ConfigError;

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_URL: &str = "https://discord.com/api";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Minimum length in bytes of the secret used to sign link state tokens.
pub const MIN_LINK_STATE_SECRET_LEN: usize = 32;

/// Discord OAuth application and community server settings.
#[derive(Clone, Debug)]
pub struct DiscordConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Exact callback URL registered with the Discord application.
    pub redirect_url: String,
    /// Community server to invite linked members into. Optional; linking works without it.
    pub guild_id: Option<String>,

    pub auth_url: String,
    pub token_url: String,
    /// Base URL of the Discord REST API, without trailing slash.
    pub api_url: String,
}

/// External identity provider used for primary sign-in.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    /// Bearer-authenticated endpoint returning the signed-in user's JSON profile.
    pub userinfo_url: String,
    /// Project API key sent as the `apikey` header, when the provider requires one.
    pub api_key: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Public base URL of the dashboard front end.
    pub app_url: String,
    pub bind_address: String,
    pub link_state_secret: String,

    pub discord: DiscordConfig,
    pub identity: IdentityConfig,
}

impl Config {
    /// Loads configuration from process environment variables.
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError)` - A variable is missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    ///
    /// # Arguments
    /// - `lookup` - Returns the value of the named variable, if set
    ///
    /// # Returns
    /// - `Ok(Config)` - All required variables present and valid
    /// - `Err(ConfigError)` - A variable is missing or malformed
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &str| {
            optional(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let config = Self {
            database_url: required("DATABASE_URL")?,
            app_url: required("APP_URL")?
                .trim_end_matches('/')
                .to_string(),
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            link_state_secret: required("LINK_STATE_SECRET")?,
            discord: DiscordConfig {
                client_id: required("DISCORD_CLIENT_ID")?,
                client_secret: required("DISCORD_CLIENT_SECRET")?,
                redirect_url: required("DISCORD_REDIRECT_URL")?,
                guild_id: optional("DISCORD_GUILD_ID"),
                auth_url: DISCORD_AUTH_URL.to_string(),
                token_url: DISCORD_TOKEN_URL.to_string(),
                api_url: DISCORD_API_URL.to_string(),
            },
            identity: IdentityConfig {
                userinfo_url: required("IDENTITY_USERINFO_URL")?,
                api_key: optional("IDENTITY_API_KEY"),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Checks the semantic validity of loaded values.
    ///
    /// # Returns
    /// - `Ok(())` - Configuration is usable
    /// - `Err(ConfigError::InvalidEnvVar)` - First invalid value found
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("APP_URL", &self.app_url),
            ("DISCORD_REDIRECT_URL", &self.discord.redirect_url),
            ("IDENTITY_USERINFO_URL", &self.identity.userinfo_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        }

        if self.link_state_secret.len() < MIN_LINK_STATE_SECRET_LEN {
            return Err(ConfigError::InvalidEnvVar {
                name: "LINK_STATE_SECRET".to_string(),
                reason: format!("must be at least {} bytes", MIN_LINK_STATE_SECRET_LEN),
            });
        }

        if let Some(guild_id) = &self.discord.guild_id {
            if guild_id.parse::<u64>().is_err() {
                return Err(ConfigError::InvalidEnvVar {
                    name: "DISCORD_GUILD_ID".to_string(),
                    reason: "must be a numeric Discord snowflake".to_string(),
                });
            }
        }

        Ok(())
    }

    /// URL of the dashboard settings surface that receives callback outcomes.
    pub fn settings_url(&self) -> String {
        format!("{}/dashboard/settings", self.app_url)
    }
}

#[cfg(test)]
impl Config {
    /// Configuration pointing every outbound call at a local fake upstream.
    pub fn for_upstream(upstream: &test_utils::upstream::FakeUpstream) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            app_url: "http://app.test".to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            link_state_secret: "test-link-state-secret-0123456789abcdef".to_string(),
            discord: DiscordConfig {
                client_id: "client-id".to_string(),
                client_secret: "client-secret".to_string(),
                redirect_url: "http://app.test/api/discord/callback".to_string(),
                guild_id: Some("123456789012345678".to_string()),
                auth_url: DISCORD_AUTH_URL.to_string(),
                token_url: upstream.discord_token_url(),
                api_url: upstream.discord_api_url(),
            },
            identity: IdentityConfig {
                userinfo_url: upstream.identity_userinfo_url(),
                api_key: None,
            },
        }
    }
}
