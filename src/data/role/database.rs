//! Database backend for the role allow-list.
//!
//! Stores one `emoji_allowed_role` row per (guild, role) pair. Ids are stored as strings
//! like every other Discord snowflake column and parsed back into `u64` at the repository
//! boundary. A unique index on the pair, created by the migration, backs up the
//! transactional existence check in `add_role` when several bot instances share one
//! database.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serenity::async_trait;

use crate::{data::role::RoleStore, error::store::StoreError, model::role::RoleChange};

/// Role allow-list stored in the `emoji_allowed_role` table.
pub struct DatabaseRoleStore {
    /// Database connection pool for executing queries.
    db: DatabaseConnection,
}

impl DatabaseRoleStore {
    /// Creates a new repository instance.
    ///
    /// # Arguments
    /// - `db` - Database connection pool; clones share the pool
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleStore for DatabaseRoleStore {
    async fn add_role(&self, guild_id: u64, role_id: u64) -> Result<RoleChange, StoreError> {
        let txn = self.db.begin().await?;

        let existing = entity::prelude::EmojiAllowedRole::find()
            .filter(entity::emoji_allowed_role::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::emoji_allowed_role::Column::RoleId.eq(role_id.to_string()))
            .one(&txn)
            .await?;

        if existing.is_some() {
            txn.commit().await?;
            return Ok(RoleChange::AlreadyPresent);
        }

        entity::emoji_allowed_role::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(guild_id.to_string()),
            role_id: ActiveValue::Set(role_id.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::debug!("Allowed role {} in guild {}", role_id, guild_id);

        Ok(RoleChange::Added)
    }

    async fn remove_role(&self, guild_id: u64, role_id: u64) -> Result<RoleChange, StoreError> {
        let result = entity::prelude::EmojiAllowedRole::delete_many()
            .filter(entity::emoji_allowed_role::Column::GuildId.eq(guild_id.to_string()))
            .filter(entity::emoji_allowed_role::Column::RoleId.eq(role_id.to_string()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(RoleChange::NotPresent);
        }

        tracing::debug!("Removed role {} from guild {}", role_id, guild_id);

        Ok(RoleChange::Removed)
    }

    async fn list_roles(&self, guild_id: u64) -> Result<Vec<u64>, StoreError> {
        let entities = entity::prelude::EmojiAllowedRole::find()
            .filter(entity::emoji_allowed_role::Column::GuildId.eq(guild_id.to_string()))
            .order_by_asc(entity::emoji_allowed_role::Column::Id)
            .all(&self.db)
            .await?;

        entities
            .into_iter()
            .map(|entity| {
                entity
                    .role_id
                    .parse::<u64>()
                    .map_err(|_| StoreError::CorruptId(entity.role_id))
            })
            .collect()
    }
}
