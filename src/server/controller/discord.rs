use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        discord::{
            FindMemberDto, GenerateInviteDto, InviteDto, LinkDiscordDto, LinkDiscordResultDto,
            LinkEligibilityDto, LinkErrorDto, UnlinkDiscordDto,
        },
    },
    server::{
        error::{auth::AuthError, AppError},
        middleware::auth::AuthGuard,
        model::{link::CallbackParam, member::LinkDiscordParam},
        service::{invite::InviteService, link::DiscordLinkService, member::MemberService},
        state::AppState,
    },
};

/// Tag for grouping Discord linking endpoints in OpenAPI documentation
pub static DISCORD_TAG: &str = "discord";

const INVITE_MISSING_MESSAGE: &str =
    "The community server invite is not configured, please contact an admin.";

fn link_service(state: &AppState) -> DiscordLinkService<'_> {
    DiscordLinkService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.discord,
        &state.link_state,
    )
}

/// Start linking a Discord account.
///
/// Redirects the signed-in member to Discord's authorization page. The OAuth `state`
/// is a signed token carrying the member's email.
///
/// # Access Control
/// - Approved, signed-in member
///
/// # Returns
/// - `307 Temporary Redirect` - To the Discord authorization URL
/// - `401 Unauthorized` - Not signed in
/// - `403 Forbidden` - Member not approved
#[utoipa::path(
    get,
    path = "/api/discord/authorize",
    tag = DISCORD_TAG,
    responses(
        (status = 307, description = "Redirect to Discord authorization"),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Member not approved", body = ErrorDto)
    ),
)]
pub async fn authorize(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let member = AuthGuard::new(&state.db, &session).require().await?;

    let url = link_service(&state).authorize_url(&member.email)?;

    tracing::info!("Member {} started Discord linking", member.email);

    Ok(Redirect::temporary(url.as_str()))
}

/// Discord authorization callback.
///
/// Exchanges the code, fetches the Discord profile, resolves the member, persists the
/// link and redirects to the dashboard settings page with the outcome in the query
/// string. Every outcome, including failures, is a redirect. A query string that
/// cannot be parsed is treated as carrying no code.
///
/// # Returns
/// - `303 See Other` - To `{APP_URL}/dashboard/settings` with `discord_success` or `discord_error`
#[utoipa::path(
    get,
    path = "/api/discord/callback",
    tag = DISCORD_TAG,
    params(CallbackParam),
    responses(
        (status = 303, description = "Redirect to the dashboard settings page")
    ),
)]
pub async fn callback(
    State(state): State<AppState>,
    query: Result<Query<CallbackParam>, QueryRejection>,
) -> impl IntoResponse {
    let param = match query {
        Ok(Query(param)) => param,
        Err(rejection) => {
            tracing::warn!("Malformed Discord callback query: {}", rejection);
            CallbackParam::default()
        }
    };

    let result = link_service(&state).callback(param).await;

    Redirect::to(result.redirect_url(state.settings_url.clone()).as_str())
}

/// Link a Discord account to the signed-in member.
///
/// JSON variant of the callback's persistence step for clients that already hold the
/// Discord identity.
///
/// # Access Control
/// - Approved, signed-in member; `memberEmail` must be their own email
///
/// # Returns
/// - `200 OK` - Linked, or already linked to this account
/// - `400 Bad Request` - Invalid body
/// - `403 Forbidden` - `memberEmail` belongs to someone else, or member not approved
/// - `404 Not Found` - Member not found
/// - `409 Conflict` - Member linked to another account, or account linked to another member
/// - `500 Internal Server Error` - Storage failure
#[utoipa::path(
    post,
    path = "/api/discord/link",
    tag = DISCORD_TAG,
    request_body = LinkDiscordDto,
    responses(
        (status = 200, description = "Discord account linked", body = LinkDiscordResultDto),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 403, description = "Not allowed to link this member", body = ErrorDto),
        (status = 404, description = "Member not found", body = LinkErrorDto),
        (status = 409, description = "Link conflict", body = LinkErrorDto),
        (status = 500, description = "Internal server error", body = LinkErrorDto)
    ),
)]
pub async fn link(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LinkDiscordDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    AuthGuard::new(&state.db, &session)
        .require_member(&payload.member_email)
        .await?;

    let outcome = MemberService::new(&state.db)
        .link_discord(LinkDiscordParam {
            email: payload.member_email,
            discord_id: payload.external_id,
            username: payload.external_username,
            discriminator: payload
                .external_discriminator
                .filter(|tag| !tag.is_empty()),
        })
        .await?;

    let invite = InviteService::new(&state.discord).invite_url();
    let invite_message = invite
        .is_none()
        .then(|| INVITE_MISSING_MESSAGE.to_string());

    let message = if outcome.already_linked {
        "Discord account already linked"
    } else {
        "Discord account linked successfully"
    };

    Ok((
        StatusCode::OK,
        Json(LinkDiscordResultDto {
            success: true,
            message: message.to_string(),
            already_linked: outcome.already_linked,
            invite,
            invite_message,
        }),
    ))
}

/// Unlink the signed-in member's Discord account.
///
/// # Access Control
/// - Approved, signed-in member; `memberEmail` must be their own email
///
/// # Returns
/// - `200 OK` - Discord fields cleared
/// - `403 Forbidden` - `memberEmail` belongs to someone else
/// - `404 Not Found` - Member not found
#[utoipa::path(
    post,
    path = "/api/discord/unlink",
    tag = DISCORD_TAG,
    request_body = UnlinkDiscordDto,
    responses(
        (status = 200, description = "Discord account unlinked", body = MessageDto),
        (status = 403, description = "Not allowed to unlink this member", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto)
    ),
)]
pub async fn unlink(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UnlinkDiscordDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    AuthGuard::new(&state.db, &session)
        .require_member(&payload.member_email)
        .await?;

    MemberService::new(&state.db)
        .unlink_discord(&payload.member_email)
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageDto {
            success: true,
            message: "Discord account unlinked".to_string(),
        }),
    ))
}

/// Generate the community server invite for the signed-in member.
///
/// # Access Control
/// - Approved, signed-in member; `memberIdentifier` (email or member id) must be their own
///
/// # Returns
/// - `200 OK` - Invite URL
/// - `403 Forbidden` - Identifier belongs to someone else
/// - `404 Not Found` - No member matches the identifier
/// - `503 Service Unavailable` - Invite not configured
#[utoipa::path(
    post,
    path = "/api/discord/generate-invite",
    tag = DISCORD_TAG,
    request_body = GenerateInviteDto,
    responses(
        (status = 200, description = "Invite URL", body = InviteDto),
        (status = 403, description = "Not allowed to invite this member", body = ErrorDto),
        (status = 404, description = "Member not found", body = ErrorDto),
        (status = 503, description = "Invite not configured", body = ErrorDto)
    ),
)]
pub async fn generate_invite(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<GenerateInviteDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let signed_in = AuthGuard::new(&state.db, &session).require().await?;

    let member = MemberService::new(&state.db)
        .get_by_identifier(&payload.member_identifier)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;

    if member.id != signed_in.id {
        return Err(AuthError::EmailMismatch {
            signed_in: signed_in.email,
            requested: member.email,
        }
        .into());
    }

    let Some(invite_url) = InviteService::new(&state.discord).invite_url() else {
        return Err(AppError::Unavailable(INVITE_MISSING_MESSAGE.to_string()));
    };

    tracing::info!(
        "Generated Discord invite for member {} ({})",
        member.email,
        payload.external_username.as_deref().unwrap_or("unknown Discord user")
    );

    Ok((
        StatusCode::OK,
        Json(InviteDto {
            success: true,
            invite_url,
        }),
    ))
}

/// Check whether a Discord account can be linked to the signed-in member.
///
/// # Access Control
/// - Approved, signed-in member; `email` must be their own email
///
/// # Returns
/// - `200 OK` - Linking would succeed; `alreadyLinked` when it is a no-op
/// - `403 Forbidden` - `email` belongs to someone else
/// - `409 Conflict` - Member linked to another account, or account linked to another member
#[utoipa::path(
    post,
    path = "/api/discord/find-user-by-email",
    tag = DISCORD_TAG,
    request_body = FindMemberDto,
    responses(
        (status = 200, description = "Member can link this account", body = LinkEligibilityDto),
        (status = 403, description = "Not allowed to query this member", body = ErrorDto),
        (status = 409, description = "Link conflict", body = LinkErrorDto)
    ),
)]
pub async fn find_user_by_email(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<FindMemberDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    AuthGuard::new(&state.db, &session)
        .require_member(&payload.email)
        .await?;

    let eligibility = MemberService::new(&state.db)
        .check_link_eligibility(&payload.email, &payload.discord_id)
        .await?;

    let message = if eligibility.already_linked {
        "Discord account already linked to this member"
    } else {
        "Member found"
    };

    Ok((
        StatusCode::OK,
        Json(LinkEligibilityDto {
            success: true,
            message: message.to_string(),
            user_email: eligibility.member.email,
            full_name: eligibility.member.full_name,
            already_linked: eligibility.already_linked,
        }),
    ))
}
