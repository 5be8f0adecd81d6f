use oauth2::{
    basic::BasicErrorResponse, AuthorizationCode, HttpClientError, RequestTokenError,
    TokenResponse,
};
use serenity::all::User as DiscordUser;

use crate::server::{
    error::link::LinkError, model::discord::DiscordProfile, service::link::DiscordLinkService,
};

type TokenRequestError = RequestTokenError<HttpClientError<reqwest::Error>, BasicErrorResponse>;

impl<'a> DiscordLinkService<'a> {
    /// Exchanges an authorization code for an access token.
    ///
    /// Client credentials and the registered redirect URI are sent in the form body.
    ///
    /// # Returns
    /// - `Ok(String)` - Non-empty access token
    /// - `Err(LinkError::TokenExchangeFailed)` - Non-2xx, transport failure, timeout or unparseable body
    /// - `Err(LinkError::NoAccessToken)` - 2xx response without an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, LinkError> {
        let token = self
            .oauth_client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(self.http_client)
            .await
            .map_err(token_error)?;

        let access_token = token.access_token().secret();
        if access_token.is_empty() {
            return Err(LinkError::NoAccessToken);
        }

        Ok(access_token.clone())
    }

    /// Fetches the Discord profile the access token belongs to.
    ///
    /// # Returns
    /// - `Ok(DiscordProfile)` - Profile decoded from `users/@me`
    /// - `Err(LinkError::UserInfoFailed)` - Non-2xx, transport failure, timeout or unparseable body
    pub async fn fetch_profile(&self, access_token: &str) -> Result<DiscordProfile, LinkError> {
        let response = self
            .http_client
            .get(format!("{}/users/@me", self.discord.api_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| LinkError::UserInfoFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkError::UserInfoFailed(format!(
                "users/@me returned {}",
                status
            )));
        }

        let user: DiscordUser = response
            .json()
            .await
            .map_err(|e| LinkError::UserInfoFailed(e.to_string()))?;

        Ok(DiscordProfile::from_user(user))
    }
}

/// Classifies a failed token request.
///
/// A token body that decodes except for a missing `access_token` is the only parse
/// failure reported as `NoAccessToken`; error bodies fail on the `error` field instead.
fn token_error(err: TokenRequestError) -> LinkError {
    match err {
        RequestTokenError::ServerResponse(response) => {
            let mut reason = format!("token endpoint returned {}", response.error().as_ref());
            if let Some(description) = response.error_description() {
                reason.push_str(&format!(": {}", description));
            }
            LinkError::TokenExchangeFailed(reason)
        }
        RequestTokenError::Request(e) => LinkError::TokenExchangeFailed(e.to_string()),
        RequestTokenError::Parse(e, _)
            if e.to_string().contains("missing field `access_token`") =>
        {
            LinkError::NoAccessToken
        }
        RequestTokenError::Parse(e, _) => LinkError::TokenExchangeFailed(e.to_string()),
        RequestTokenError::Other(reason) => LinkError::TokenExchangeFailed(reason),
    }
}
