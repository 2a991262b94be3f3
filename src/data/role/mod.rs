//! Role allow-list storage.
//!
//! `RoleStore` is the contract both backends implement:
//! - `JsonRoleStore` - single JSON document rewritten on every mutation (default)
//! - `DatabaseRoleStore` - SeaORM table, for deployments running several bot instances
//!
//! Every mutation is a single read-modify-write that each backend makes atomic, so
//! concurrent `add_role`/`remove_role` calls for the same guild never lose updates.

pub mod database;
pub mod json;

#[cfg(test)]
mod test;

pub use database::DatabaseRoleStore;
pub use json::JsonRoleStore;

use serenity::async_trait;

use crate::{
    error::store::StoreError,
    model::role::{GuildAllowList, RoleChange},
};

/// Per-guild allow-list of roles permitted to import emojis.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Adds a role to the guild's allow-list.
    ///
    /// # Returns
    /// - `Ok(RoleChange::Added)` - Role stored
    /// - `Ok(RoleChange::AlreadyPresent)` - Role was already allowed, nothing written
    /// - `Err(StoreError)` - Backend failure
    async fn add_role(&self, guild_id: u64, role_id: u64) -> Result<RoleChange, StoreError>;

    /// Removes a role from the guild's allow-list.
    ///
    /// # Returns
    /// - `Ok(RoleChange::Removed)` - Role deleted
    /// - `Ok(RoleChange::NotPresent)` - Role was not allowed, nothing written
    /// - `Err(StoreError)` - Backend failure
    async fn remove_role(&self, guild_id: u64, role_id: u64) -> Result<RoleChange, StoreError>;

    /// Lists the guild's allowed roles in the order they were added.
    async fn list_roles(&self, guild_id: u64) -> Result<Vec<u64>, StoreError>;

    /// Loads the guild's allow-list as a domain model.
    async fn allow_list(&self, guild_id: u64) -> Result<GuildAllowList, StoreError> {
        Ok(GuildAllowList::new(guild_id, self.list_roles(guild_id).await?))
    }

    /// Whether any of `role_ids` is allowed in the guild.
    ///
    /// Fails closed: a guild without configuration allows nobody.
    async fn is_allowed(&self, guild_id: u64, role_ids: &[u64]) -> Result<bool, StoreError> {
        Ok(self.allow_list(guild_id).await?.permits(role_ids))
    }
}
