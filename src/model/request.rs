/// Who invoked an import, and where.
///
/// Built by the bot layer from the interaction or message that triggered the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    /// Guild the emoji will be created in.
    pub guild_id: u64,
    /// Invoking user, the rate limiter key.
    pub user_id: u64,
    /// Roles the invoking member holds in the guild.
    pub role_ids: Vec<u64>,
}

impl ImportRequest {
    pub fn new(guild_id: u64, user_id: u64, role_ids: Vec<u64>) -> Self {
        Self {
            guild_id,
            user_id,
            role_ids,
        }
    }
}
