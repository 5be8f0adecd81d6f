use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251210_000001_create_member_table::Member;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only accepts one column per ALTER TABLE statement
        for column in [
            string_null(DiscordLink::DiscordId),
            string_null(DiscordLink::DiscordUsername),
            string_null(DiscordLink::DiscordDiscriminator),
            timestamp_with_time_zone_null(DiscordLink::DiscordLinkedAt),
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Member::Table)
                        .add_column(column)
                        .to_owned(),
                )
                .await?;
        }

        // A Discord account may be linked to at most one member
        manager
            .create_index(
                Index::create()
                    .name("idx_member_discord_id")
                    .table(Member::Table)
                    .col(DiscordLink::DiscordId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_member_discord_id")
                    .table(Member::Table)
                    .to_owned(),
            )
            .await?;

        for column in [
            DiscordLink::DiscordLinkedAt,
            DiscordLink::DiscordDiscriminator,
            DiscordLink::DiscordUsername,
            DiscordLink::DiscordId,
        ] {
            manager
                .alter_table(
                    Table::alter()
                        .table(Member::Table)
                        .drop_column(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum DiscordLink {
    DiscordId,
    DiscordUsername,
    DiscordDiscriminator,
    DiscordLinkedAt,
}
