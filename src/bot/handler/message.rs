use serenity::all::{Context, CreateAllowedMentions, CreateMessage, GuildId, Message};

use crate::{
    bot::command::{execute, parse::parse_text_command, EmojiCommand, Invoker},
    state::AppState,
};

/// Handles prefixed text commands posted in guild channels.
///
/// Messages from bots, direct messages and anything that is not one of our commands are
/// ignored.
pub async fn handle_message(state: &AppState, ctx: Context, message: Message) {
    if message.author.bot {
        return;
    }

    // Only handle messages in guild channels (not DMs)
    let Some(guild_id) = message.guild_id else {
        return;
    };

    let Some(parsed) = parse_text_command(&message.content, &state.command_prefix) else {
        return;
    };

    let reply = match parsed {
        Err(usage) => usage.message(&state.command_prefix),
        Ok(command) => {
            if matches!(command, EmojiCommand::GetEmoji { .. }) {
                if let Err(e) = message.channel_id.broadcast_typing(&ctx.http).await {
                    tracing::debug!("Failed to send typing indicator: {:?}", e);
                }
            }

            let invoker = Invoker {
                user_id: message.author.id.get(),
                guild_id: Some(guild_id.get()),
                role_ids: member_role_ids(&ctx, &message, guild_id).await,
            };

            execute(state, &invoker, command).await
        }
    };

    let builder = CreateMessage::new()
        .content(reply)
        .reference_message(&message)
        .allowed_mentions(CreateAllowedMentions::new());

    if let Err(e) = message.channel_id.send_message(&ctx.http, builder).await {
        tracing::error!(
            "Failed to reply in channel {}: {:?}",
            message.channel_id,
            e
        );
    }
}

/// Roles of the message author in the guild.
///
/// Gateway messages usually carry the author's member data; fall back to the API when
/// they don't.
async fn member_role_ids(ctx: &Context, message: &Message, guild_id: GuildId) -> Vec<u64> {
    if let Some(member) = &message.member {
        return member.roles.iter().map(|role| role.get()).collect();
    }

    match guild_id.member(&ctx.http, message.author.id).await {
        Ok(member) => member.roles.iter().map(|role| role.get()).collect(),
        Err(e) => {
            tracing::warn!(
                "Failed to fetch member {} of guild {}: {:?}",
                message.author.id,
                guild_id,
                e
            );
            Vec::new()
        }
    }
}
