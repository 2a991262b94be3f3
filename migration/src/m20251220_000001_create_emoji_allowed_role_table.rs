use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmojiAllowedRole::Table)
                    .if_not_exists()
                    .col(pk_auto(EmojiAllowedRole::Id))
                    .col(string(EmojiAllowedRole::GuildId))
                    .col(string(EmojiAllowedRole::RoleId))
                    .col(timestamp_with_time_zone(EmojiAllowedRole::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // One row per (guild, role) pair
        manager
            .create_index(
                Index::create()
                    .name("idx_emoji_allowed_role_guild_role")
                    .table(EmojiAllowedRole::Table)
                    .col(EmojiAllowedRole::GuildId)
                    .col(EmojiAllowedRole::RoleId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmojiAllowedRole::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum EmojiAllowedRole {
    Table,
    Id,
    GuildId,
    RoleId,
    CreatedAt,
}
