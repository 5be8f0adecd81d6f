//! Failure taxonomy of the Discord account-linking flow.
//!
//! Every variant knows the classification string it is reported under, which is shared
//! between the callback redirect (`discord_error=...`) and the JSON link endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::discord::LinkErrorDto;

/// OAuth `error` values Discord may send back to the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderError {
    AccessDenied,
    InvalidClient,
    InvalidScope,
    InvalidRequest,
    Unauthorized,
    ServerError,
    TemporarilyUnavailable,
    Other,
}

impl ProviderError {
    /// Classifies a raw OAuth `error` parameter.
    ///
    /// `unauthorized_client` is folded into `unauthorized`; anything unrecognized is `Other`.
    pub fn parse(error: &str) -> Self {
        match error {
            "access_denied" => Self::AccessDenied,
            "invalid_client" => Self::InvalidClient,
            "invalid_scope" => Self::InvalidScope,
            "invalid_request" => Self::InvalidRequest,
            "unauthorized" | "unauthorized_client" => Self::Unauthorized,
            "server_error" => Self::ServerError,
            "temporarily_unavailable" => Self::TemporarilyUnavailable,
            _ => Self::Other,
        }
    }

    pub fn classification(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::InvalidClient => "invalid_client",
            Self::InvalidScope => "invalid_scope",
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
            Self::Other => "other",
        }
    }

    /// Default human-readable explanation when Discord sends no description.
    fn default_details(self) -> &'static str {
        match self {
            Self::AccessDenied => "You cancelled the Discord authorization",
            Self::InvalidClient => "Discord rejected the application credentials",
            Self::InvalidScope => "Discord rejected the requested permissions",
            Self::InvalidRequest => "Discord rejected the authorization request",
            Self::Unauthorized => "The application is not authorized to use this flow",
            Self::ServerError => "Discord encountered an error, please try again",
            Self::TemporarilyUnavailable => "Discord is temporarily unavailable, please try again",
            Self::Other => "Discord authorization failed",
        }
    }
}

/// Why the callback could not determine which member initiated the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionFailure {
    StateMissing,
    StateInvalid,
    EmailUnverified,
    NoMatchingMember,
}

impl ResolutionFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StateMissing => "state_missing",
            Self::StateInvalid => "state_invalid",
            Self::EmailUnverified => "email_unverified",
            Self::NoMatchingMember => "no_matching_member",
        }
    }
}

#[derive(Error, Debug)]
pub enum LinkError {
    /// Discord redirected back with an OAuth `error` parameter.
    #[error("Discord returned authorization error {}", .error.classification())]
    Provider {
        error: ProviderError,
        description: Option<String>,
    },

    /// Callback carried neither `code` nor `error`.
    #[error("Callback received without an authorization code")]
    NoCode,

    /// Token endpoint returned non-2xx, timed out, or sent an unreadable body.
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Token endpoint answered 2xx without a usable access token.
    #[error("Token response did not contain an access token")]
    NoAccessToken,

    /// The `users/@me` request failed.
    #[error("Failed to fetch Discord profile: {0}")]
    UserInfoFailed(String),

    /// No member could be attributed to the callback.
    #[error("Could not resolve member: {}", .reason.as_str())]
    NoUserEmail {
        reason: ResolutionFailure,
        discord_email: Option<String>,
    },

    /// Resolved email has no member record.
    #[error("No member found for {0}")]
    MemberNotFound(String),

    /// Member exists but is not approved.
    #[error("Member {0} is not approved")]
    NotApproved(String),

    /// Member is already linked to a different Discord account.
    #[error("Member already linked to Discord account {existing_username}")]
    Conflict { existing_username: String },

    /// The Discord account is linked to another member.
    #[error("Discord account {0} is linked to another member")]
    AccountInUse(String),

    /// Database failure while reading or writing the link.
    #[error("Failed to persist Discord link: {0}")]
    Storage(#[from] sea_orm::DbErr),

    /// Anything else that went wrong inside the pipeline.
    #[error("Unexpected linking error: {0}")]
    Unexpected(String),
}

impl LinkError {
    /// Machine-readable classification used in redirects and JSON responses.
    pub fn classification(&self) -> &'static str {
        match self {
            Self::Provider { error, .. } => error.classification(),
            Self::NoCode => "no_code",
            Self::TokenExchangeFailed(_) => "token_exchange_failed",
            Self::NoAccessToken => "no_access_token",
            Self::UserInfoFailed(_) => "user_info_failed",
            Self::NoUserEmail { .. } => "no_user_email",
            Self::MemberNotFound(_) | Self::NotApproved(_) | Self::Storage(_) => "link_failed",
            Self::Conflict { .. } => "conflict",
            Self::AccountInUse(_) => "account_in_use",
            Self::Unexpected(_) => "unexpected_error",
        }
    }

    /// Secondary reason code, for classifications that have several causes.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::NoUserEmail { reason, .. } => Some(reason.as_str()),
            Self::MemberNotFound(_) => Some("member_not_found"),
            Self::NotApproved(_) => Some("not_approved"),
            _ => None,
        }
    }

    /// User-facing detail text. Never contains storage or transport error text.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Provider { error, description } => Some(
                description
                    .clone()
                    .unwrap_or_else(|| error.default_details().to_string()),
            ),
            Self::Conflict { existing_username } => Some(existing_username.clone()),
            _ => None,
        }
    }

    /// Email declared on the Discord profile, when it helps explain the failure.
    pub fn discord_email(&self) -> Option<&str> {
        match self {
            Self::NoUserEmail { discord_email, .. } => discord_email.as_deref(),
            _ => None,
        }
    }

    /// Human-readable message for JSON responses.
    pub fn message(&self) -> String {
        match self {
            Self::MemberNotFound(_) => "Member not found".to_string(),
            Self::NotApproved(_) => "Only approved members can link a Discord account".to_string(),
            Self::Conflict { existing_username } => format!(
                "Your account is already linked to Discord user {}",
                existing_username
            ),
            Self::AccountInUse(_) => {
                "This Discord account is already linked to another member".to_string()
            }
            Self::Storage(_) => "Failed to link Discord account".to_string(),
            Self::Unexpected(_) => "An unexpected error occurred".to_string(),
            other => other
                .details()
                .unwrap_or_else(|| "Discord linking failed".to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MemberNotFound(_) => StatusCode::NOT_FOUND,
            Self::NotApproved(_) => StatusCode::FORBIDDEN,
            Self::Conflict { .. } | Self::AccountInUse(_) => StatusCode::CONFLICT,
            Self::TokenExchangeFailed(_) | Self::UserInfoFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Logs the error at a level matching who caused it.
    pub fn log(&self) {
        match self {
            Self::Storage(_)
            | Self::Unexpected(_)
            | Self::TokenExchangeFailed(_)
            | Self::UserInfoFailed(_) => tracing::error!("{}", self),
            _ => tracing::warn!("{}", self),
        }
    }
}

/// Converts linking errors into a JSON `LinkErrorDto` response.
impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        self.log();

        let existing_discord_username = match &self {
            Self::Conflict { existing_username } => Some(existing_username.clone()),
            _ => None,
        };

        (
            self.status(),
            Json(LinkErrorDto {
                success: false,
                error: self.message(),
                classification: self.classification().to_string(),
                existing_discord_username,
            }),
        )
            .into_response()
    }
}
