use crate::server::{data::member::MemberRepository, model::member::LinkDiscordParam};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod find_by_discord_id;
mod find_by_email;
mod link_discord;
mod unlink_discord;

fn link_param(email: &str, discord_id: &str, username: &str) -> LinkDiscordParam {
    LinkDiscordParam {
        email: email.to_string(),
        discord_id: discord_id.to_string(),
        username: username.to_string(),
        discriminator: Some("0001".to_string()),
    }
}
