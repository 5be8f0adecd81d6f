use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    data::member::MemberRepository,
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
    model::member::Member,
};

/// Guards session-authenticated endpoints.
///
/// Resolves the signed-in member from the session and re-checks the roster on every
/// request, so a member whose approval is revoked loses access immediately.
pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Requires an approved, signed-in member.
    ///
    /// # Returns
    /// - `Ok(Member)` - The signed-in member
    /// - `Err(AuthError::MemberNotInSession)` - Nobody is signed in
    /// - `Err(AuthError::MemberNotFound)` / `Err(AuthError::MemberNotApproved)` - No longer on the approved roster
    pub async fn require(&self) -> Result<Member, AppError> {
        let member_repo = MemberRepository::new(self.db);

        let Some(email) = AuthSession::new(self.session).get_member_email().await? else {
            return Err(AuthError::MemberNotInSession.into());
        };

        let Some(member) = member_repo.find_by_email(&email).await? else {
            return Err(AuthError::MemberNotFound(email).into());
        };

        if !member.is_approved() {
            return Err(AuthError::MemberNotApproved(email).into());
        }

        Ok(member)
    }

    /// Requires the signed-in member to be the member named by `email`.
    ///
    /// # Returns
    /// - `Ok(Member)` - The signed-in member, whose email equals `email`
    /// - `Err(AuthError::EmailMismatch)` - `email` names someone else
    /// - Any error of `require`
    pub async fn require_member(&self, email: &str) -> Result<Member, AppError> {
        let member = self.require().await?;

        if member.email != email {
            return Err(AuthError::EmailMismatch {
                signed_in: member.email,
                requested: email.to_string(),
            }
            .into());
        }

        Ok(member)
    }
}
