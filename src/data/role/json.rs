//! JSON document backend for the role allow-list.
//!
//! The document maps guild id strings to arrays of integer role ids:
//!
//! ```json
//! {"112233445566778899": [998877665544332211, 123456789012345678]}
//! ```
//!
//! It is read once when the store is opened and rewritten in full after every mutation.
//! The in-memory copy sits behind an async mutex held across the file write, which makes
//! each mutation an atomic document update.

use serenity::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::{data::role::RoleStore, error::store::StoreError, model::role::RoleChange};

/// Guild id string -> role ids in insertion order.
type RoleDocument = BTreeMap<String, Vec<u64>>;

/// Role allow-list persisted as a single JSON file.
pub struct JsonRoleStore {
    /// Location of the JSON document.
    path: PathBuf,
    /// In-memory copy of the document; the lock also serializes file writes.
    document: Mutex<RoleDocument>,
}

impl JsonRoleStore {
    /// Opens the store, loading the document at `path`.
    ///
    /// A missing file is treated as an empty document; it is created on the first
    /// mutation.
    ///
    /// # Arguments
    /// - `path` - Location of the JSON document
    ///
    /// # Returns
    /// - `Ok(JsonRoleStore)` - Store loaded with the file's contents
    /// - `Err(StoreError::Io)` - File exists but cannot be read
    /// - `Err(StoreError::Json)` - File is not a guild -> role id list mapping
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let document = load_document(&path).await?;

        tracing::info!(
            "Loaded role allow-lists for {} guilds from {}",
            document.len(),
            path.display()
        );

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the whole document to disk.
    ///
    /// Writes to a sibling temp file first and renames it over the target so a crash
    /// mid-write never leaves a truncated document behind.
    async fn persist(&self, document: &RoleDocument) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(document).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;

        Ok(())
    }
}

async fn load_document(path: &Path) -> Result<RoleDocument, StoreError> {
    let contents = match tokio::fs::read(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(RoleDocument::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if contents.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(RoleDocument::new());
    }

    serde_json::from_slice(&contents).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[async_trait]
impl RoleStore for JsonRoleStore {
    async fn add_role(&self, guild_id: u64, role_id: u64) -> Result<RoleChange, StoreError> {
        let mut document = self.document.lock().await;

        let roles = document.entry(guild_id.to_string()).or_default();
        if roles.contains(&role_id) {
            return Ok(RoleChange::AlreadyPresent);
        }
        roles.push(role_id);

        if let Err(e) = self.persist(&document).await {
            // Keep memory consistent with what is on disk
            if let Some(roles) = document.get_mut(&guild_id.to_string()) {
                roles.retain(|r| *r != role_id);
                if roles.is_empty() {
                    document.remove(&guild_id.to_string());
                }
            }
            return Err(e);
        }

        tracing::debug!("Allowed role {} in guild {}", role_id, guild_id);

        Ok(RoleChange::Added)
    }

    async fn remove_role(&self, guild_id: u64, role_id: u64) -> Result<RoleChange, StoreError> {
        let mut document = self.document.lock().await;
        let key = guild_id.to_string();

        let Some(roles) = document.get(&key) else {
            return Ok(RoleChange::NotPresent);
        };
        let Some(index) = roles.iter().position(|r| *r == role_id) else {
            return Ok(RoleChange::NotPresent);
        };

        let previous = roles.clone();
        let mut remaining = previous.clone();
        remaining.remove(index);
        if remaining.is_empty() {
            document.remove(&key);
        } else {
            document.insert(key.clone(), remaining);
        }

        if let Err(e) = self.persist(&document).await {
            document.insert(key, previous);
            return Err(e);
        }

        tracing::debug!("Removed role {} from guild {}", role_id, guild_id);

        Ok(RoleChange::Removed)
    }

    async fn list_roles(&self, guild_id: u64) -> Result<Vec<u64>, StoreError> {
        let document = self.document.lock().await;

        Ok(document
            .get(&guild_id.to_string())
            .cloned()
            .unwrap_or_default())
    }
}
