use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    model::{
        api::{ErrorDto, MessageDto},
        auth::CreateSessionDto,
        discord::{
            FindMemberDto, GenerateInviteDto, InviteDto, LinkDiscordDto, LinkDiscordResultDto,
            LinkEligibilityDto, LinkErrorDto, UnlinkDiscordDto,
        },
        member::{DiscordLinkDto, MemberDto},
    },
    server::{
        controller::{
            auth::{self, create_session, get_member, logout},
            discord::{
                self, authorize, callback, find_user_by_email, generate_invite, link, unlink,
            },
        },
        state::AppState,
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "HPZ Crew API"),
    paths(
        auth::create_session,
        auth::get_member,
        auth::logout,
        discord::authorize,
        discord::callback,
        discord::link,
        discord::unlink,
        discord::generate_invite,
        discord::find_user_by_email,
    ),
    components(schemas(
        ErrorDto,
        MessageDto,
        CreateSessionDto,
        MemberDto,
        DiscordLinkDto,
        LinkDiscordDto,
        LinkDiscordResultDto,
        LinkErrorDto,
        UnlinkDiscordDto,
        GenerateInviteDto,
        InviteDto,
        FindMemberDto,
        LinkEligibilityDto,
    )),
    tags(
        (name = "auth", description = "Member sign-in"),
        (name = "discord", description = "Discord account linking")
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/session", post(create_session))
        .route("/api/auth/member", get(get_member))
        .route("/api/auth/logout", get(logout))
        .route("/api/discord/authorize", get(authorize))
        .route("/api/discord/callback", get(callback))
        .route("/api/discord/link", post(link))
        .route("/api/discord/unlink", post(unlink))
        .route("/api/discord/generate-invite", post(generate_invite))
        .route("/api/discord/find-user-by-email", post(find_user_by_email))
        .route("/api/openapi.json", get(openapi))
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
