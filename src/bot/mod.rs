//! Discord bot integration.
//!
//! The bot listens for slash command interactions and prefixed text messages, turns both
//! into `command::EmojiCommand`s and replies with the outcome. Slash commands are
//! registered globally once the bot is ready.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive guild availability events
//! - `GUILD_MESSAGES` - Receive messages for text commands
//! - `MESSAGE_CONTENT` - Read the text of those messages (privileged intent)
//!
//! Note: `MESSAGE_CONTENT` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application. Slash commands keep
//! working without it.

pub mod command;
pub mod handler;
pub mod start;
