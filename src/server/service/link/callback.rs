use crate::server::{
    error::link::{LinkError, ProviderError},
    model::link::{CallbackParam, LinkOutcome, LinkResult},
    service::{invite::InviteService, link::DiscordLinkService, member::MemberService},
};

impl<'a> DiscordLinkService<'a> {
    /// Runs the complete callback pipeline and reports its outcome.
    ///
    /// Never fails: every error is logged and converted into a `LinkResult::Failed`.
    /// Provider errors and missing codes return before any outbound call.
    ///
    /// # Arguments
    /// - `param` - Query parameters Discord redirected back with
    ///
    /// # Returns
    /// - `LinkResult` - Outcome to encode into the settings redirect
    pub async fn callback(&self, param: CallbackParam) -> LinkResult {
        match self.link_from_callback(param).await {
            Ok(outcome) => {
                tracing::info!(
                    "Discord callback completed for member {} (already linked: {})",
                    outcome.member.email,
                    outcome.already_linked
                );
                LinkResult::Linked {
                    already_linked: outcome.already_linked,
                    invite_url: InviteService::new(self.discord).invite_url(),
                }
            }
            Err(err) => {
                err.log();
                LinkResult::from(&err)
            }
        }
    }

    async fn link_from_callback(&self, param: CallbackParam) -> Result<LinkOutcome, LinkError> {
        if let Some(error) = param.error.as_deref() {
            return Err(LinkError::Provider {
                error: ProviderError::parse(error),
                description: param.error_description.filter(|d| !d.is_empty()),
            });
        }

        let Some(code) = param.code.filter(|code| !code.is_empty()) else {
            return Err(LinkError::NoCode);
        };

        let access_token = self.exchange_code(&code).await?;
        let profile = self.fetch_profile(&access_token).await?;

        tracing::debug!("Fetched Discord profile {} ({})", profile.id, profile.display_name());

        let email = self
            .resolve_member_email(param.state.as_deref(), &profile)
            .await?;

        MemberService::new(self.db)
            .link_discord(profile.into_link_param(email))
            .await
    }
}
