//! Primary sign-in through the external identity provider.
//!
//! The dashboard front end authenticates members with the identity provider and hands
//! the resulting access token to this service, which resolves it to an approved member.
//! This service never issues primary credentials itself.

use reqwest::StatusCode;
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::server::{
    config::IdentityConfig,
    data::member::MemberRepository,
    error::{auth::AuthError, AppError},
    model::member::Member,
};

/// Subset of the identity provider's user-info response this service reads.
#[derive(Deserialize)]
struct UserInfo {
    #[serde(default)]
    email: Option<String>,
}

pub struct IdentityService<'a> {
    pub db: &'a DatabaseConnection,
    pub http_client: &'a reqwest::Client,
    pub identity: &'a IdentityConfig,
}

impl<'a> IdentityService<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        http_client: &'a reqwest::Client,
        identity: &'a IdentityConfig,
    ) -> Self {
        Self {
            db,
            http_client,
            identity,
        }
    }

    /// Resolves an identity provider access token to an approved member.
    ///
    /// # Arguments
    /// - `access_token` - Token issued by the identity provider
    ///
    /// # Returns
    /// - `Ok(Member)` - Token valid and its email belongs to an approved member
    /// - `Err(AuthError::InvalidAccessToken)` - Provider rejected the token
    /// - `Err(AuthError::MemberNotFound)` / `Err(AuthError::MemberNotApproved)` - Not on the approved roster
    /// - `Err(AuthError::IdentityProviderFailed)` - Provider unreachable or unusable response
    pub async fn sign_in(&self, access_token: &str) -> Result<Member, AppError> {
        let email = self.fetch_email(access_token).await?;

        let member_repo = MemberRepository::new(self.db);
        let Some(member) = member_repo.find_by_email(&email).await? else {
            return Err(AuthError::MemberNotFound(email).into());
        };

        if !member.is_approved() {
            return Err(AuthError::MemberNotApproved(email).into());
        }

        tracing::info!("Member {} signed in", member.email);

        Ok(member)
    }

    async fn fetch_email(&self, access_token: &str) -> Result<String, AuthError> {
        let mut request = self
            .http_client
            .get(&self.identity.userinfo_url)
            .bearer_auth(access_token);

        if let Some(api_key) = &self.identity.api_key {
            request = request.header("apikey", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::IdentityProviderFailed(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(AuthError::InvalidAccessToken)
            }
            status if !status.is_success() => {
                return Err(AuthError::IdentityProviderFailed(format!(
                    "user info returned {}",
                    status
                )))
            }
            _ => {}
        }

        let user_info: UserInfo = response
            .json()
            .await
            .map_err(|e| AuthError::IdentityProviderFailed(e.to_string()))?;

        user_info
            .email
            .filter(|email| !email.is_empty())
            .ok_or(AuthError::InvalidAccessToken)
    }
}
