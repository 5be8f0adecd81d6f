//! Discord API payload fixtures.

use serde_json::{json, Value};

/// Default Discord user ID used by profile fixtures.
pub const DEFAULT_DISCORD_ID: &str = "999";

/// Default Discord username used by profile fixtures.
pub const DEFAULT_USERNAME: &str = "alice_d";

/// Builds a `users/@me` response body.
///
/// `discriminator` of `"0"` models an account on Discord's unique-username system.
///
/// # Example
/// ```rust,ignore
/// let body = fixture::discord::user("999", "alice_d", "0001", Some("alice@discord.example"), true);
/// ```
pub fn user(
    id: &str,
    username: &str,
    discriminator: &str,
    email: Option<&str>,
    verified: bool,
) -> Value {
    json!({
        "id": id,
        "username": username,
        "discriminator": discriminator,
        "global_name": null,
        "avatar": null,
        "email": email,
        "verified": verified,
    })
}

/// Builds a `users/@me` body with default values and the given verified email.
pub fn verified_user(email: &str) -> Value {
    user(DEFAULT_DISCORD_ID, DEFAULT_USERNAME, "0001", Some(email), true)
}

/// Builds a successful token endpoint response body.
pub fn token(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 604800,
        "refresh_token": "refresh",
        "scope": "identify email guilds.join",
    })
}

/// Builds the error body Discord returns for a rejected authorization code.
pub fn invalid_grant() -> Value {
    json!({
        "error": "invalid_grant",
        "error_description": "Invalid \"code\" in request.",
    })
}
