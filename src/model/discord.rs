use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for `POST /api/discord/link`.
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkDiscordDto {
    #[validate(length(min = 1))]
    pub external_id: String,
    #[validate(length(min = 1))]
    pub external_username: String,
    #[serde(default)]
    pub external_discriminator: Option<String>,
    #[validate(email)]
    pub member_email: String,
}

/// Successful link response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkDiscordResultDto {
    pub success: bool,
    pub message: String,
    /// True when the member was already linked to this exact Discord account.
    pub already_linked: bool,
    /// Community server invite URL, omitted when the invite is not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_message: Option<String>,
}

/// Failed link response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkErrorDto {
    pub success: bool,
    pub error: String,
    /// Machine-readable classification, same vocabulary as the callback redirect.
    pub classification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_discord_username: Option<String>,
}

/// Request body for `POST /api/discord/unlink`.
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnlinkDiscordDto {
    #[validate(email)]
    pub member_email: String,
}

/// Request body for `POST /api/discord/generate-invite`.
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInviteDto {
    /// Member email or numeric member id.
    #[validate(length(min = 1))]
    pub member_identifier: String,
    #[serde(default)]
    pub external_username: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteDto {
    pub success: bool,
    pub invite_url: String,
}

/// Request body for `POST /api/discord/find-user-by-email`.
#[derive(Serialize, Deserialize, Debug, Clone, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FindMemberDto {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub discord_id: String,
}

/// Linking eligibility for a member and Discord account pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkEligibilityDto {
    pub success: bool,
    pub message: String,
    pub user_email: String,
    pub full_name: String,
    pub already_linked: bool,
}
