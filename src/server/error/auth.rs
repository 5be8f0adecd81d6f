use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No member email stored in the session.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("No member is signed in")]
    MemberNotInSession,

    /// The identity provider rejected the presented access token.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("Identity provider rejected the access token")]
    InvalidAccessToken,

    /// The identity provider could not be reached or returned an unusable response.
    ///
    /// Results in a 502 Bad Gateway response.
    #[error("Identity provider request failed: {0}")]
    IdentityProviderFailed(String),

    /// Signed-in identity has no member record.
    ///
    /// Results in a 403 Forbidden response.
    #[error("No member record for {0}")]
    MemberNotFound(String),

    /// Member exists but their application has not been approved.
    ///
    /// Results in a 403 Forbidden response.
    #[error("Member {0} is not approved")]
    MemberNotApproved(String),

    /// A request body names a member other than the signed-in one.
    ///
    /// Results in a 403 Forbidden response.
    #[error("Member {signed_in} attempted to act on behalf of {requested}")]
    EmailMismatch {
        /// Email of the signed-in member
        signed_in: String,
        /// Email named in the request
        requested: String,
    },
}

/// Converts authentication errors into HTTP responses.
///
/// Client-facing messages stay generic; the full error is logged at debug level.
///
/// # Returns
/// - 401 Unauthorized - Not signed in or rejected access token
/// - 403 Forbidden - Unknown, unapproved or mismatched member
/// - 502 Bad Gateway - Identity provider failure
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let (status, message) = match self {
            Self::MemberNotInSession => (StatusCode::UNAUTHORIZED, "Not signed in"),
            Self::InvalidAccessToken => (StatusCode::UNAUTHORIZED, "Invalid or expired session"),
            Self::IdentityProviderFailed(_) => (
                StatusCode::BAD_GATEWAY,
                "Unable to verify your session, please try again later",
            ),
            Self::MemberNotFound(_) | Self::MemberNotApproved(_) => (
                StatusCode::FORBIDDEN,
                "Your application has not been approved yet",
            ),
            Self::EmailMismatch { .. } => (
                StatusCode::FORBIDDEN,
                "You can only manage your own account",
            ),
        };

        (
            status,
            Json(ErrorDto {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
