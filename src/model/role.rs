//! Role allow-list domain models.

/// Outcome of an allow-list mutation.
///
/// Add and remove are idempotent: repeating them reports a no-op variant instead of
/// failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    /// The role was not in the list and has been added.
    Added,
    /// The role was already in the list; nothing changed.
    AlreadyPresent,
    /// The role was in the list and has been removed.
    Removed,
    /// The role was not in the list; nothing changed.
    NotPresent,
}

impl RoleChange {
    /// Whether the mutation changed the stored list.
    pub fn is_change(self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

/// Roles allowed to run the import command in one guild, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildAllowList {
    pub guild_id: u64,
    pub role_ids: Vec<u64>,
}

impl GuildAllowList {
    pub fn new(guild_id: u64, role_ids: Vec<u64>) -> Self {
        Self { guild_id, role_ids }
    }

    /// An empty list means the guild never configured the command.
    pub fn is_configured(&self) -> bool {
        !self.role_ids.is_empty()
    }

    /// Whether any of the member's roles is on the list.
    pub fn permits(&self, member_roles: &[u64]) -> bool {
        self.role_ids.iter().any(|role| member_roles.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_permits_nobody() {
        let list = GuildAllowList::new(1, Vec::new());
        assert!(!list.is_configured());
        assert!(!list.permits(&[10, 20]));
    }

    #[test]
    fn permits_on_any_intersection() {
        let list = GuildAllowList::new(1, vec![10, 30]);
        assert!(list.permits(&[20, 30]));
        assert!(!list.permits(&[20, 40]));
        assert!(!list.permits(&[]));
    }

    #[test]
    fn only_added_and_removed_are_changes() {
        assert!(RoleChange::Added.is_change());
        assert!(RoleChange::Removed.is_change());
        assert!(!RoleChange::AlreadyPresent.is_change());
        assert!(!RoleChange::NotPresent.is_change());
    }
}
