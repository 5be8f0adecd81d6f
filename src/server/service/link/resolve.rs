use crate::server::{
    data::member::MemberRepository,
    error::link::{LinkError, ResolutionFailure},
    model::discord::DiscordProfile,
    service::link::DiscordLinkService,
};

impl<'a> DiscordLinkService<'a> {
    /// Determines which member email a callback links to.
    ///
    /// A valid link state is authoritative and wins over any profile email. Only when
    /// the state is missing or invalid does the Discord profile email count, and then
    /// only if Discord verified it and it matches a member exactly.
    ///
    /// # Arguments
    /// - `state` - Raw OAuth `state` parameter, if any
    /// - `profile` - Discord profile fetched for this attempt
    ///
    /// # Returns
    /// - `Ok(String)` - Member email to link
    /// - `Err(LinkError::NoUserEmail)` - Nobody could be attributed, with the reason
    /// - `Err(LinkError::Storage)` - Database error during fallback lookup
    pub async fn resolve_member_email(
        &self,
        state: Option<&str>,
        profile: &DiscordProfile,
    ) -> Result<String, LinkError> {
        let state_failure = match state.filter(|state| !state.is_empty()) {
            None => ResolutionFailure::StateMissing,
            Some(token) => match self.link_state.verify(token) {
                Ok(email) => return Ok(email),
                Err(failure) => failure,
            },
        };

        tracing::debug!(
            "Link state unusable ({}), trying Discord profile email",
            state_failure.as_str()
        );

        let Some(email) = profile.verified_email() else {
            let reason = match profile.email {
                Some(_) => ResolutionFailure::EmailUnverified,
                None => state_failure,
            };
            return Err(LinkError::NoUserEmail {
                reason,
                discord_email: profile.email.clone(),
            });
        };

        let member_repo = MemberRepository::new(self.db);
        match member_repo.find_by_email(email).await? {
            Some(member) => Ok(member.email),
            None => Err(LinkError::NoUserEmail {
                reason: ResolutionFailure::NoMatchingMember,
                discord_email: Some(email.to_string()),
            }),
        }
    }
}
