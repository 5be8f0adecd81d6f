use oauth2::{CsrfToken, Scope};
use url::Url;

use crate::server::{
    error::AppError,
    service::link::{DiscordLinkService, LINK_SCOPES},
};

impl<'a> DiscordLinkService<'a> {
    /// Builds the Discord authorization URL for the member with `email`.
    ///
    /// The `state` parameter is a freshly signed link state carrying the email.
    ///
    /// # Returns
    /// - `Ok(Url)` - Authorization URL with client id, redirect URI, scopes and state
    /// - `Err(AppError::JwtErr)` - Failed to sign the state
    pub fn authorize_url(&self, email: &str) -> Result<Url, AppError> {
        let state = self.link_state.issue(email)?;

        let (url, _) = self
            .oauth_client
            .authorize_url(move || CsrfToken::new(state))
            .add_scopes(LINK_SCOPES.iter().map(|scope| Scope::new(scope.to_string())))
            .url();

        Ok(url)
    }
}
