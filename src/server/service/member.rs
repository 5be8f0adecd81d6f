//! Member service for business logic.
//!
//! This module provides the `MemberService` which owns the rules for attaching a Discord
//! account to a member: approval gating, idempotent relinking, conflict detection in both
//! directions and classification of lost update races.

use sea_orm::{DatabaseConnection, SqlErr};

use crate::server::{
    data::member::MemberRepository,
    error::{link::LinkError, AppError},
    model::{
        link::LinkOutcome,
        member::{LinkDiscordParam, Member},
    },
};

/// Result of checking whether a Discord account may be linked to a member.
#[derive(Debug, Clone)]
pub struct LinkEligibility {
    pub member: Member,
    pub already_linked: bool,
}

/// Service providing business logic for members and their Discord links.
pub struct MemberService<'a> {
    pub db: &'a DatabaseConnection,
}

impl<'a> MemberService<'a> {
    /// Creates a new MemberService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `MemberService` - New service instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Retrieves a member by email or, when the identifier is numeric, by id.
    ///
    /// # Returns
    /// - `Ok(Some(Member))` - Member found
    /// - `Ok(None)` - No member matches the identifier
    /// - `Err(AppError::DbErr)` - Database error during query
    pub async fn get_by_identifier(&self, identifier: &str) -> Result<Option<Member>, AppError> {
        let member_repo = MemberRepository::new(self.db);

        let member = match identifier.parse::<i32>() {
            Ok(id) => member_repo.find_by_id(id).await?,
            Err(_) => member_repo.find_by_email(identifier).await?,
        };

        Ok(member)
    }

    /// Checks whether `discord_id` may be linked to the member with `email`.
    ///
    /// Performs the same checks as `link_discord` without writing anything.
    ///
    /// # Returns
    /// - `Ok(LinkEligibility)` - Linking would succeed
    /// - `Err(LinkError::MemberNotFound)` / `Err(LinkError::NotApproved)` - Member cannot link
    /// - `Err(LinkError::Conflict)` - Member is linked to a different account
    /// - `Err(LinkError::AccountInUse)` - Account is linked to another member
    /// - `Err(LinkError::Storage)` - Database error
    pub async fn check_link_eligibility(
        &self,
        email: &str,
        discord_id: &str,
    ) -> Result<LinkEligibility, LinkError> {
        let member_repo = MemberRepository::new(self.db);

        let member = self.require_linkable_member(email).await?;

        let already_linked = match &member.discord {
            Some(link) if link.id == discord_id => true,
            Some(link) => {
                return Err(LinkError::Conflict {
                    existing_username: link.username.clone(),
                })
            }
            None => false,
        };

        if !already_linked {
            if let Some(owner) = member_repo.find_by_discord_id(discord_id).await? {
                if owner.id != member.id {
                    return Err(LinkError::AccountInUse(discord_id.to_string()));
                }
            }
        }

        Ok(LinkEligibility {
            member,
            already_linked,
        })
    }

    /// Links a Discord account to a member.
    ///
    /// Relinking the account a member already has is an idempotent success that writes
    /// nothing. The write itself is a conditional update; if it matches no row because
    /// a concurrent attempt got there first, the member is re-read and the outcome
    /// classified from the stored state.
    ///
    /// # Arguments
    /// - `param` - Member email and Discord account to link
    ///
    /// # Returns
    /// - `Ok(LinkOutcome)` - Account linked, or was already linked to this member
    /// - `Err(LinkError)` - Member missing or not approved, conflict, or storage failure
    pub async fn link_discord(&self, param: LinkDiscordParam) -> Result<LinkOutcome, LinkError> {
        let member_repo = MemberRepository::new(self.db);

        let eligibility = self
            .check_link_eligibility(&param.email, &param.discord_id)
            .await?;

        if eligibility.already_linked {
            tracing::info!(
                "Member {} already linked to Discord account {}",
                param.email,
                param.discord_id
            );
            return Ok(LinkOutcome {
                member: eligibility.member,
                already_linked: true,
            });
        }

        match member_repo.link_discord(&param).await {
            Ok(true) => {}
            Ok(false) => return self.classify_lost_update(&param).await,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(LinkError::AccountInUse(param.discord_id));
            }
            Err(err) => return Err(LinkError::Storage(err)),
        }

        let member = member_repo
            .find_by_email(&param.email)
            .await?
            .ok_or_else(|| LinkError::MemberNotFound(param.email.clone()))?;

        tracing::info!(
            "Linked Discord account {} ({}) to member {}",
            param.discord_id,
            param.username,
            param.email
        );

        Ok(LinkOutcome {
            member,
            already_linked: false,
        })
    }

    /// Clears the Discord link of the member with `email`.
    ///
    /// # Returns
    /// - `Ok(Member)` - Member after unlinking
    /// - `Err(AppError::NotFound)` - No member with that email
    /// - `Err(AppError::DbErr)` - Database error during update
    pub async fn unlink_discord(&self, email: &str) -> Result<Member, AppError> {
        let member_repo = MemberRepository::new(self.db);

        let member = member_repo
            .unlink_discord(email)
            .await?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

        tracing::info!("Unlinked Discord account from member {}", email);

        Ok(member)
    }

    async fn require_linkable_member(&self, email: &str) -> Result<Member, LinkError> {
        let member_repo = MemberRepository::new(self.db);

        let Some(member) = member_repo.find_by_email(email).await? else {
            return Err(LinkError::MemberNotFound(email.to_string()));
        };

        if !member.is_approved() {
            return Err(LinkError::NotApproved(email.to_string()));
        }

        Ok(member)
    }

    /// Classifies a conditional update that matched no row.
    async fn classify_lost_update(&self, param: &LinkDiscordParam) -> Result<LinkOutcome, LinkError> {
        let member_repo = MemberRepository::new(self.db);

        let Some(member) = member_repo.find_by_email(&param.email).await? else {
            return Err(LinkError::MemberNotFound(param.email.clone()));
        };

        match &member.discord {
            Some(link) if link.id == param.discord_id => Ok(LinkOutcome {
                member,
                already_linked: true,
            }),
            Some(link) => Err(LinkError::Conflict {
                existing_username: link.username.clone(),
            }),
            None => Err(LinkError::Unexpected(format!(
                "link update for {} matched no rows",
                param.email
            ))),
        }
    }
}
