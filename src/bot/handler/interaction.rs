use serenity::all::{
    CommandInteraction, Context, CreateAllowedMentions, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse, Interaction,
};

use crate::{
    bot::command::{execute, parse::parse_slash_command, EmojiCommand, Invoker},
    state::AppState,
};

/// Handles slash command interactions.
///
/// `getemoji` is deferred first because fetching and uploading can outlast Discord's
/// three second response window; the deferred reply is then edited with the outcome.
/// Everything else is answered immediately.
pub async fn handle_interaction_create(state: &AppState, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    let Some(parsed) = parse_slash_command(&command.data) else {
        tracing::warn!("Received unknown command /{}", command.data.name);
        return;
    };

    let invoker = invoker(&command);

    match parsed {
        Err(usage) => respond(&ctx, &command, usage.message("/")).await,
        Ok(parsed @ EmojiCommand::GetEmoji { .. }) => {
            if let Err(e) = command.defer(&ctx.http).await {
                tracing::error!("Failed to defer /{}: {:?}", command.data.name, e);
                return;
            }

            let reply = execute(state, &invoker, parsed).await;

            let edit = EditInteractionResponse::new()
                .content(reply)
                .allowed_mentions(CreateAllowedMentions::new());
            if let Err(e) = command.edit_response(&ctx.http, edit).await {
                tracing::error!("Failed to edit /{} response: {:?}", command.data.name, e);
            }
        }
        Ok(parsed) => {
            let reply = execute(state, &invoker, parsed).await;
            respond(&ctx, &command, reply).await;
        }
    }
}

fn invoker(command: &CommandInteraction) -> Invoker {
    Invoker {
        user_id: command.user.id.get(),
        guild_id: command.guild_id.map(|guild_id| guild_id.get()),
        role_ids: command
            .member
            .as_ref()
            .map(|member| member.roles.iter().map(|role| role.get()).collect())
            .unwrap_or_default(),
    }
}

async fn respond(ctx: &Context, command: &CommandInteraction, content: String) {
    let message = CreateInteractionResponseMessage::new()
        .content(content)
        .allowed_mentions(CreateAllowedMentions::new());

    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        tracing::error!("Failed to respond to /{}: {:?}", command.data.name, e);
    }
}
