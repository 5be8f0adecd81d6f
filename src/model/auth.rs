use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for exchanging an identity provider access token for a dashboard session.
#[derive(Serialize, Deserialize, Debug, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionDto {
    /// Access token issued by the external identity provider.
    #[validate(length(min = 1))]
    pub access_token: String,
}
