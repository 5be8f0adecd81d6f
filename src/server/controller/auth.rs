use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use validator::Validate;

use crate::{
    model::{api::ErrorDto, auth::CreateSessionDto, member::MemberDto},
    server::{
        error::AppError,
        middleware::{auth::AuthGuard, session::AuthSession},
        service::auth::IdentityService,
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Sign in with an identity provider access token.
///
/// Validates the token against the identity provider's user-info endpoint, checks the
/// resulting email against the approved roster and stores the member in the session.
///
/// # Arguments
/// - `state` - Application state containing the database and HTTP client
/// - `session` - Session to sign the member into
/// - `payload` - Identity provider access token
///
/// # Returns
/// - `200 OK` - Signed-in member
/// - `401 Unauthorized` - Token rejected by the identity provider
/// - `403 Forbidden` - Email not on the approved roster
/// - `502 Bad Gateway` - Identity provider unavailable
#[utoipa::path(
    post,
    path = "/api/auth/session",
    tag = AUTH_TAG,
    request_body = CreateSessionDto,
    responses(
        (status = 200, description = "Signed in", body = MemberDto),
        (status = 401, description = "Access token rejected", body = ErrorDto),
        (status = 403, description = "Member not approved", body = ErrorDto),
        (status = 502, description = "Identity provider unavailable", body = ErrorDto)
    ),
)]
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateSessionDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let identity_service = IdentityService::new(&state.db, &state.http_client, &state.identity);
    let member = identity_service.sign_in(&payload.access_token).await?;

    AuthSession::new(&session)
        .set_member_email(&member.email)
        .await?;

    Ok((StatusCode::OK, Json(member.into_dto())))
}

/// Get the signed-in member.
///
/// # Access Control
/// - Approved, signed-in member
///
/// # Returns
/// - `200 OK` - Member profile including any linked Discord account
/// - `401 Unauthorized` - Not signed in
/// - `403 Forbidden` - Member no longer approved
#[utoipa::path(
    get,
    path = "/api/auth/member",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Signed-in member", body = MemberDto),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 403, description = "Member not approved", body = ErrorDto)
    ),
)]
pub async fn get_member(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let member = AuthGuard::new(&state.db, &session).require().await?;

    Ok((StatusCode::OK, Json(member.into_dto())))
}

/// Sign out and delete the session.
///
/// # Returns
/// - `204 No Content` - Session cleared
#[utoipa::path(
    get,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 204, description = "Signed out")
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await?;

    Ok(StatusCode::NO_CONTENT)
}
