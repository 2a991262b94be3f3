//! Turning slash command data and prefixed messages into `EmojiCommand`s.

use serenity::all::{CommandData, CommandDataOptionValue};

use super::{CommandUsage, EmojiCommand};

/// Most URLs accepted by one text `getemoji`.
pub const MAX_URLS_PER_COMMAND: usize = 5;

type Parsed = Result<EmojiCommand, CommandUsage>;

/// Parses a prefixed text command.
///
/// Recognised forms:
/// - `getemoji <url> [<url> ...]`
/// - `emoji get <url>`, `emoji addrole <role>`, `emoji removerole <role>`, `emoji listroles`
/// - `addrole <role>`, `removerole <role>`, `listroles`
///
/// Command names are case-insensitive. Roles are given as a mention (`<@&id>`) or a raw id.
///
/// # Returns
/// - `None` - Not one of our commands; the message should be ignored
/// - `Some(Ok(EmojiCommand))` - Command ready to execute
/// - `Some(Err(CommandUsage))` - Our command, with unusable arguments
pub fn parse_text_command(content: &str, prefix: &str) -> Option<Parsed> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let name = words.next()?.to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let parsed = match name.as_str() {
        "getemoji" => get_emoji(&args),
        "addrole" => role_argument(&args, CommandUsage::AddRole).map(EmojiCommand::AddRole),
        "removerole" => {
            role_argument(&args, CommandUsage::RemoveRole).map(EmojiCommand::RemoveRole)
        }
        "listroles" => Ok(EmojiCommand::ListRoles),
        "emoji" => group(&args),
        _ => return None,
    };

    Some(parsed)
}

/// `emoji <subcommand> ...`
fn group(args: &[&str]) -> Parsed {
    let Some((subcommand, rest)) = args.split_first() else {
        return Err(CommandUsage::Group);
    };

    match subcommand.to_ascii_lowercase().as_str() {
        "get" => match rest {
            [url] => Ok(EmojiCommand::GetEmoji {
                urls: vec![url.to_string()],
                name: None,
            }),
            _ => Err(CommandUsage::Group),
        },
        "addrole" => role_argument(rest, CommandUsage::Group).map(EmojiCommand::AddRole),
        "removerole" => role_argument(rest, CommandUsage::Group).map(EmojiCommand::RemoveRole),
        "listroles" => Ok(EmojiCommand::ListRoles),
        _ => Err(CommandUsage::Group),
    }
}

fn get_emoji(args: &[&str]) -> Parsed {
    if args.is_empty() {
        return Err(CommandUsage::GetEmoji);
    }
    if args.len() > MAX_URLS_PER_COMMAND {
        return Err(CommandUsage::TooManyUrls);
    }

    Ok(EmojiCommand::GetEmoji {
        urls: args.iter().map(|url| url.to_string()).collect(),
        name: None,
    })
}

fn role_argument(args: &[&str], usage: CommandUsage) -> Result<u64, CommandUsage> {
    match args {
        [role] => parse_role_id(role).ok_or(usage),
        _ => Err(usage),
    }
}

/// Parses `<@&id>` or a bare id.
pub fn parse_role_id(raw: &str) -> Option<u64> {
    let id = raw
        .strip_prefix("<@&")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);

    id.parse::<u64>().ok().filter(|id| *id != 0)
}

/// Parses a slash command interaction.
///
/// # Returns
/// - `None` - Not one of our commands
/// - `Some(Ok(EmojiCommand))` - Command ready to execute
/// - `Some(Err(CommandUsage))` - A required option is missing
pub fn parse_slash_command(data: &CommandData) -> Option<Parsed> {
    let option = |name: &str| {
        data.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| &option.value)
    };
    let string_option = |name: &str| match option(name) {
        Some(CommandDataOptionValue::String(value)) => Some(value.trim().to_string()),
        _ => None,
    };
    let role_option = |name: &str| match option(name) {
        Some(CommandDataOptionValue::Role(role_id)) => Some(role_id.get()),
        _ => None,
    };

    let parsed = match data.name.as_str() {
        "getemoji" => match string_option("url") {
            Some(url) => Ok(EmojiCommand::GetEmoji {
                urls: vec![url],
                name: string_option("name").filter(|name| !name.is_empty()),
            }),
            None => Err(CommandUsage::GetEmoji),
        },
        "addrole" => role_option("role")
            .ok_or(CommandUsage::AddRole)
            .map(EmojiCommand::AddRole),
        "removerole" => role_option("role")
            .ok_or(CommandUsage::RemoveRole)
            .map(EmojiCommand::RemoveRole),
        "listroles" => Ok(EmojiCommand::ListRoles),
        _ => return None,
    };

    Some(parsed)
}
