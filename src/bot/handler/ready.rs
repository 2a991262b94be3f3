//! Ready event handler for bot initialization.
//!
//! This module handles the `ready` event which is fired when the bot successfully
//! connects to Discord's gateway and completes the initial handshake.
//!
//! The ready handler is used to:
//! - Log connection information
//! - Register the slash commands
//! - Record the application owner so they may manage the role allow-list

use serenity::all::{ActivityData, Command, Context, CurrentApplicationInfo, Ready};

use crate::{bot::command::register, state::AppState};

/// Handles the ready event when the bot connects to Discord.
///
/// Failures are logged and leave the bot running: text commands work without the slash
/// commands, and owners from `BOT_OWNER_IDS` are already known.
///
/// # Arguments
/// - `state` - Shared state whose owner set is extended
/// - `ctx` - Discord context for registering commands
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(state: &AppState, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::custom("Collecting emojis")));

    match Command::set_global_commands(&ctx.http, register::application_commands()).await {
        Ok(commands) => tracing::info!("Registered {} slash commands", commands.len()),
        Err(e) => tracing::error!("Failed to register slash commands: {:?}", e),
    }

    match ctx.http.get_current_application_info().await {
        Ok(info) => {
            let owners = application_owner_ids(&info);
            tracing::debug!("Application owners: {:?}", owners);
            state.access.add_owners(owners);
        }
        Err(e) => tracing::warn!("Failed to fetch application owner: {:?}", e),
    }
}

/// The application's owner, or every member of the owning team.
fn application_owner_ids(info: &CurrentApplicationInfo) -> Vec<u64> {
    let mut ids: Vec<u64> = info.owner.iter().map(|owner| owner.id.get()).collect();

    if let Some(team) = &info.team {
        ids.extend(team.members.iter().map(|member| member.user.id.get()));
    }

    ids
}
