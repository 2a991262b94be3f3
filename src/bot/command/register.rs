use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, InteractionContext};

/// Slash commands registered globally when the bot becomes ready.
///
/// Every command is guild-only. Role management is visible to everyone since bot owners
/// need not hold any guild permission; the handler restricts it to owners.
pub fn application_commands() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("getemoji")
            .description("Import an emoji from a web page into this server")
            .contexts(guild_only())
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "url", "Emoji page URL")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "name",
                    "Emoji name; derived from the page when omitted",
                )
                .required(false),
            ),
        CreateCommand::new("addrole")
            .description("Allow a role to import emojis")
            .contexts(guild_only())
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "Role to allow")
                    .required(true),
            ),
        CreateCommand::new("removerole")
            .description("Stop allowing a role to import emojis")
            .contexts(guild_only())
            .add_option(
                CreateCommandOption::new(CommandOptionType::Role, "role", "Role to remove")
                    .required(true),
            ),
        CreateCommand::new("listroles")
            .description("List the roles allowed to import emojis")
            .contexts(guild_only()),
    ]
}

fn guild_only() -> Vec<InteractionContext> {
    vec![InteractionContext::Guild]
}
