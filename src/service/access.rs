//! Bot owner bookkeeping.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Set of users treated as bot owners.
///
/// Owners may manage the role allow-list and bypass it when importing emojis. They are
/// still rate limited. The set starts with the configured ids and grows once the
/// application owner is fetched from Discord.
#[derive(Clone, Default)]
pub struct AccessPolicy {
    owners: Arc<RwLock<HashSet<u64>>>,
}

impl AccessPolicy {
    pub fn new(owner_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            owners: Arc::new(RwLock::new(owner_ids.into_iter().collect())),
        }
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&user_id)
    }

    /// Adds owners discovered at runtime.
    pub fn add_owners(&self, owner_ids: impl IntoIterator<Item = u64>) {
        self.owners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(owner_ids);
    }
}
