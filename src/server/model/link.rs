//! Outcome of a linking attempt and its encoding into the settings redirect.

use serde::Deserialize;
use url::Url;
use utoipa::IntoParams;

use crate::server::{error::link::LinkError, model::member::Member};

/// Query parameters Discord sends to the authorization callback.
///
/// Every field is optional; which ones are present decides the callback outcome.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CallbackParam {
    /// Authorization code
    pub code: Option<String>,
    /// OAuth error returned by Discord
    pub error: Option<String>,
    /// Human-readable OAuth error
    pub error_description: Option<String>,
    /// Signed link state
    pub state: Option<String>,
}

/// Successful persistence of a Discord link.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub member: Member,
    /// The member was already linked to this exact Discord account; nothing was written.
    pub already_linked: bool,
}

/// Result of one callback, built once and encoded into the redirect query string.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkResult {
    Linked {
        already_linked: bool,
        /// Community server invite. `None` when the invite is not configured.
        invite_url: Option<String>,
    },
    Failed {
        classification: &'static str,
        details: Option<String>,
        reason: Option<&'static str>,
        discord_email: Option<String>,
    },
}

impl LinkResult {
    /// Appends the outcome to the settings surface URL.
    ///
    /// Success: `discord_success=true[&already_linked=true][&invite_url=..|&invite_notice=config_missing]`.
    /// Failure: `discord_error=<classification>[&details][&reason][&discord_email]`.
    pub fn redirect_url(&self, mut settings_url: Url) -> Url {
        {
            let mut query = settings_url.query_pairs_mut();

            match self {
                Self::Linked {
                    already_linked,
                    invite_url,
                } => {
                    query.append_pair("discord_success", "true");
                    if *already_linked {
                        query.append_pair("already_linked", "true");
                    }
                    match invite_url {
                        Some(url) => query.append_pair("invite_url", url),
                        None => query.append_pair("invite_notice", "config_missing"),
                    };
                }
                Self::Failed {
                    classification,
                    details,
                    reason,
                    discord_email,
                } => {
                    query.append_pair("discord_error", classification);
                    if let Some(details) = details {
                        query.append_pair("details", details);
                    }
                    if let Some(reason) = reason {
                        query.append_pair("reason", reason);
                    }
                    if let Some(email) = discord_email {
                        query.append_pair("discord_email", email);
                    }
                }
            }
        }

        settings_url
    }
}

impl From<&LinkError> for LinkResult {
    fn from(err: &LinkError) -> Self {
        Self::Failed {
            classification: err.classification(),
            details: err.details(),
            reason: err.reason(),
            discord_email: err.discord_email().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::server::error::link::ResolutionFailure;

    fn settings() -> Url {
        Url::parse("https://crew.example.com/dashboard/settings").unwrap()
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn encodes_success_with_invite() {
        let result = LinkResult::Linked {
            already_linked: false,
            invite_url: Some("https://discord.com/oauth2/authorize?guild_id=1".to_string()),
        };

        let url = result.redirect_url(settings());
        let params = query(&url);

        assert_eq!(url.path(), "/dashboard/settings");
        assert_eq!(params.get("discord_success").map(String::as_str), Some("true"));
        assert_eq!(
            params.get("invite_url").map(String::as_str),
            Some("https://discord.com/oauth2/authorize?guild_id=1")
        );
        assert!(!params.contains_key("already_linked"));
    }

    #[test]
    fn encodes_missing_invite_notice() {
        let result = LinkResult::Linked {
            already_linked: true,
            invite_url: None,
        };

        let params = query(&result.redirect_url(settings()));

        assert_eq!(params.get("already_linked").map(String::as_str), Some("true"));
        assert_eq!(
            params.get("invite_notice").map(String::as_str),
            Some("config_missing")
        );
    }

    #[test]
    fn encodes_resolution_failure() {
        let err = LinkError::NoUserEmail {
            reason: ResolutionFailure::EmailUnverified,
            discord_email: Some("alice+1@discord.example".to_string()),
        };

        let params = query(&LinkResult::from(&err).redirect_url(settings()));

        assert_eq!(
            params.get("discord_error").map(String::as_str),
            Some("no_user_email")
        );
        assert_eq!(params.get("reason").map(String::as_str), Some("email_unverified"));
        assert_eq!(
            params.get("discord_email").map(String::as_str),
            Some("alice+1@discord.example")
        );
        assert!(!params.contains_key("discord_success"));
    }
}
