//! Type-safe session management wrapper.
//!
//! Wraps the tower-sessions `Session` so handlers read and write the signed-in member
//! through named methods instead of raw keys.

use tower_sessions::Session;

use crate::server::error::AppError;

// Session key constants
const SESSION_AUTH_MEMBER_EMAIL: &str = "auth:member_email";

/// Authentication session management.
///
/// Handles the signed-in member's email and session lifecycle operations.
pub struct AuthSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    /// Creates a new AuthSession wrapper.
    ///
    /// # Arguments
    /// - `session` - Reference to the tower-sessions Session to wrap
    ///
    /// # Returns
    /// A new AuthSession instance
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the signed-in member's email.
    ///
    /// Cycles the session id first so a session id issued before sign-in cannot be
    /// reused afterwards.
    ///
    /// # Returns
    /// - `Ok(())` - Email successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_member_email(&self, email: &str) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session
            .insert(SESSION_AUTH_MEMBER_EMAIL, email.to_string())
            .await?;
        Ok(())
    }

    /// Retrieves the signed-in member's email.
    ///
    /// # Returns
    /// - `Ok(Some(email))` - A member is signed in
    /// - `Ok(None)` - No member in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_member_email(&self) -> Result<Option<String>, AppError> {
        Ok(self.session.get::<String>(SESSION_AUTH_MEMBER_EMAIL).await?)
    }

    /// Removes all data from the session and deletes it from the store.
    ///
    /// # Returns
    /// - `Ok(())` - Session removed
    /// - `Err(AppError::SessionErr(_))` - Store failed to delete the session
    pub async fn clear(&self) -> Result<(), AppError> {
        self.session.flush().await?;
        Ok(())
    }
}
