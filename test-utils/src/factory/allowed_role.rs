//! Allowed role factory for creating `emoji_allowed_role` rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating allow-list rows with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::allowed_role::AllowedRoleFactory;
///
/// let row = AllowedRoleFactory::new(&db)
///     .guild_id(111)
///     .role_id(222)
///     .build()
///     .await?;
/// ```
pub struct AllowedRoleFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: u64,
    role_id: u64,
}

impl<'a> AllowedRoleFactory<'a> {
    /// Creates a new AllowedRoleFactory with default values.
    ///
    /// Defaults:
    /// - guild_id: auto-incremented unique id
    /// - role_id: auto-incremented unique id
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id(),
            role_id: next_id(),
        }
    }

    /// Sets the guild the role belongs to.
    pub fn guild_id(mut self, guild_id: u64) -> Self {
        self.guild_id = guild_id;
        self
    }

    /// Sets the allowed role's id.
    pub fn role_id(mut self, role_id: u64) -> Self {
        self.role_id = role_id;
        self
    }

    /// Builds and inserts the row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::emoji_allowed_role::Model)` - Created row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::emoji_allowed_role::Model, DbErr> {
        entity::emoji_allowed_role::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id.to_string()),
            role_id: ActiveValue::Set(self.role_id.to_string()),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates an allow-list row with default values.
///
/// Shorthand for `AllowedRoleFactory::new(db).build().await`.
pub async fn create_allowed_role(
    db: &DatabaseConnection,
) -> Result<entity::emoji_allowed_role::Model, DbErr> {
    AllowedRoleFactory::new(db).build().await
}

/// Creates an allow-list row for a specific guild and role.
pub async fn create_allowed_role_for(
    db: &DatabaseConnection,
    guild_id: u64,
    role_id: u64,
) -> Result<entity::emoji_allowed_role::Model, DbErr> {
    AllowedRoleFactory::new(db)
        .guild_id(guild_id)
        .role_id(role_id)
        .build()
        .await
}
