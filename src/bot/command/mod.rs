//! Commands understood by the bot, independent of how they were invoked.
//!
//! Slash commands and prefixed text commands are both parsed into an `EmojiCommand`
//! (see `parse`) and run through `execute`, which returns the plain-text reply.

pub mod parse;
pub mod register;

use crate::{
    error::import::{DenialReason, ImportError},
    model::{emoji::ImportOutcome, request::ImportRequest, role::RoleChange},
    state::AppState,
};

/// Discord's message length limit.
pub const MAX_REPLY_LEN: usize = 2000;

const NOT_OWNER_MESSAGE: &str = "Only the bot owner can manage the allowed roles.";
const STORE_FAILURE_MESSAGE: &str = "Something went wrong while updating the role configuration.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmojiCommand {
    /// Import emojis from one or more pages.
    GetEmoji {
        urls: Vec<String>,
        name: Option<String>,
    },
    /// Allow a role to import emojis.
    AddRole(u64),
    /// Stop allowing a role to import emojis.
    RemoveRole(u64),
    /// Show the allowed roles.
    ListRoles,
}

/// A command was recognised but its arguments were not usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandUsage {
    GetEmoji,
    TooManyUrls,
    AddRole,
    RemoveRole,
    Group,
}

impl CommandUsage {
    /// Usage hint for the command, written with the invoker's prefix.
    pub fn message(self, prefix: &str) -> String {
        match self {
            Self::GetEmoji => format!("Usage: `{prefix}getemoji <url> [<url> ...]`"),
            Self::TooManyUrls => format!(
                "You can import at most {} emojis at once.",
                parse::MAX_URLS_PER_COMMAND
            ),
            Self::AddRole => format!("Usage: `{prefix}addrole <@role or role id>`"),
            Self::RemoveRole => format!("Usage: `{prefix}removerole <@role or role id>`"),
            Self::Group => format!(
                "Usage: `{prefix}emoji get <url>`, `{prefix}emoji addrole <role>`, \
                 `{prefix}emoji removerole <role>` or `{prefix}emoji listroles`"
            ),
        }
    }
}

/// Who issued a command, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    pub user_id: u64,
    /// `None` outside of a guild.
    pub guild_id: Option<u64>,
    pub role_ids: Vec<u64>,
}

/// Runs a command and renders the reply.
///
/// Never fails: every error is turned into a message for the invoker.
pub async fn execute(state: &AppState, invoker: &Invoker, command: EmojiCommand) -> String {
    let Some(guild_id) = invoker.guild_id else {
        return ImportError::PermissionDenied(DenialReason::NotInGuild).user_message();
    };

    let reply = match command {
        EmojiCommand::GetEmoji { urls, name } => {
            let request = ImportRequest::new(guild_id, invoker.user_id, invoker.role_ids.clone());
            get_emoji(state, &request, urls, name).await
        }
        EmojiCommand::AddRole(role_id) => {
            if !state.access.is_owner(invoker.user_id) {
                return NOT_OWNER_MESSAGE.to_string();
            }
            match state.roles.add_role(guild_id, role_id).await {
                Ok(change) => {
                    log_role_change(guild_id, role_id, invoker.user_id, change);
                    role_change_message(role_id, change)
                }
                Err(e) => {
                    tracing::error!("Failed to add role {} in guild {}: {}", role_id, guild_id, e);
                    STORE_FAILURE_MESSAGE.to_string()
                }
            }
        }
        EmojiCommand::RemoveRole(role_id) => {
            if !state.access.is_owner(invoker.user_id) {
                return NOT_OWNER_MESSAGE.to_string();
            }
            match state.roles.remove_role(guild_id, role_id).await {
                Ok(change) => {
                    log_role_change(guild_id, role_id, invoker.user_id, change);
                    role_change_message(role_id, change)
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to remove role {} in guild {}: {}",
                        role_id,
                        guild_id,
                        e
                    );
                    STORE_FAILURE_MESSAGE.to_string()
                }
            }
        }
        EmojiCommand::ListRoles => match state.roles.list_roles(guild_id).await {
            Ok(roles) => list_roles_message(&roles),
            Err(e) => {
                tracing::error!("Failed to list roles for guild {}: {}", guild_id, e);
                ImportError::Store(e).user_message()
            }
        },
    };

    fit_reply(reply)
}

async fn get_emoji(
    state: &AppState,
    request: &ImportRequest,
    urls: Vec<String>,
    name: Option<String>,
) -> String {
    if let [source] = urls.as_slice() {
        let outcome = ImportOutcome {
            source: source.clone(),
            result: state
                .import
                .import_emoji(request, source, name.as_deref())
                .await,
        };
        log_outcome(&outcome);
        return outcome.user_message();
    }

    match state.import.import_many(request, &urls).await {
        Ok(outcomes) => outcomes
            .iter()
            .map(|outcome| {
                log_outcome(outcome);
                format!("`{}`: {}", outcome.source, outcome.user_message())
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Err(e) => e.user_message(),
    }
}

fn log_outcome(outcome: &ImportOutcome) {
    match &outcome.result {
        Ok(_) => {}
        Err(ImportError::Store(e)) => {
            tracing::error!("Role store failure while importing {}: {}", outcome.source, e)
        }
        Err(e) => tracing::debug!("Import of {} failed: {}", outcome.source, e),
    }
}

fn log_role_change(guild_id: u64, role_id: u64, user_id: u64, change: RoleChange) {
    if change.is_change() {
        tracing::info!(
            "User {} changed allow-list of guild {}: role {} {:?}",
            user_id,
            guild_id,
            role_id,
            change
        );
    }
}

fn role_change_message(role_id: u64, change: RoleChange) -> String {
    match change {
        RoleChange::Added => format!("Role <@&{role_id}> added."),
        RoleChange::AlreadyPresent => format!("Role <@&{role_id}> is already allowed."),
        RoleChange::Removed => format!("Role <@&{role_id}> removed."),
        RoleChange::NotPresent => {
            format!("Role <@&{role_id}> was not found in the list of allowed roles.")
        }
    }
}

fn list_roles_message(roles: &[u64]) -> String {
    if roles.is_empty() {
        return "No roles have been set to use `getemoji`.".to_string();
    }

    let mentions: Vec<String> = roles.iter().map(|id| format!("<@&{id}>")).collect();
    format!("Roles allowed to use `getemoji`: {}", mentions.join(", "))
}

/// Cuts a reply down to Discord's length limit.
fn fit_reply(mut reply: String) -> String {
    if reply.chars().count() <= MAX_REPLY_LEN {
        return reply;
    }

    let cut = reply
        .char_indices()
        .nth(MAX_REPLY_LEN - 1)
        .map_or(reply.len(), |(i, _)| i);
    reply.truncate(cut);
    reply.push('…');
    reply
}
