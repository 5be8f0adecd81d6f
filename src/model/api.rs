use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic error body returned by JSON endpoints.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

/// Generic `{ success, message }` acknowledgement.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageDto {
    pub success: bool,
    pub message: String,
}
