//! Shared state handed to the Discord event handler.

use std::sync::Arc;

use crate::{
    data::role::RoleStore,
    service::{access::AccessPolicy, import::EmojiImportService},
};

/// Application state shared by every event the bot handles.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Per-guild role allow-list.
    pub roles: Arc<dyn RoleStore>,

    /// Emoji import pipeline.
    pub import: Arc<EmojiImportService>,

    /// Bot owners, extended when the bot becomes ready.
    pub access: AccessPolicy,

    /// Prefix for text commands, e.g. `!`.
    pub command_prefix: Arc<str>,
}

impl AppState {
    pub fn new(
        roles: Arc<dyn RoleStore>,
        import: Arc<EmojiImportService>,
        access: AccessPolicy,
        command_prefix: &str,
    ) -> Self {
        Self {
            roles,
            import,
            access,
            command_prefix: Arc::from(command_prefix),
        }
    }
}
