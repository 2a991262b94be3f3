//! Emoji creation on Discord.
//!
//! Serenity errors are classified into `PlatformError` here so nothing above this module
//! sees Discord's status codes or JSON error codes.

use serenity::all::GuildId;
use serenity::http::{Http, HttpError};
use serenity::async_trait;
use std::sync::Arc;

use crate::{
    error::import::PlatformError,
    model::{emoji::EmojiName, emoji::ImportedEmoji, image::ValidatedImage},
};

/// Missing Permissions
const CODE_MISSING_PERMISSIONS: isize = 50013;
/// Maximum number of emojis reached
const CODE_MAX_EMOJIS: isize = 30008;
/// File uploaded exceeds the maximum size
const CODE_FILE_TOO_LARGE: isize = 50045;

#[async_trait]
pub trait EmojiPlatform: Send + Sync {
    /// Creates a custom emoji in a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Guild to create the emoji in
    /// - `name` - Emoji name, already sanitized
    /// - `image` - Validated image payload
    ///
    /// # Returns
    /// - `Ok(ImportedEmoji)` - Emoji created
    /// - `Err(PlatformError)` - Discord refused the request
    async fn create_emoji(
        &self,
        guild_id: u64,
        name: &EmojiName,
        image: &ValidatedImage,
    ) -> Result<ImportedEmoji, PlatformError>;
}

/// `EmojiPlatform` backed by serenity's HTTP client.
pub struct SerenityEmojiPlatform {
    http: Arc<Http>,
}

impl SerenityEmojiPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl EmojiPlatform for SerenityEmojiPlatform {
    async fn create_emoji(
        &self,
        guild_id: u64,
        name: &EmojiName,
        image: &ValidatedImage,
    ) -> Result<ImportedEmoji, PlatformError> {
        let guild_id = GuildId::new(guild_id);

        // Discord accepts duplicate names; refuse them so imports never shadow an emoji
        let existing = guild_id
            .emojis(&self.http)
            .await
            .map_err(|e| classify_discord_error(&e))?;
        if existing.iter().any(|emoji| emoji.name == name.as_str()) {
            return Err(PlatformError::DuplicateName(name.to_string()));
        }

        let emoji = guild_id
            .create_emoji(&self.http, name.as_str(), &image.to_data_uri())
            .await
            .map_err(|e| {
                tracing::warn!("Discord rejected emoji {} in guild {}: {}", name, guild_id, e);
                classify_discord_error(&e)
            })?;

        Ok(ImportedEmoji {
            id: emoji.id.get(),
            name: emoji.name,
            animated: emoji.animated,
        })
    }
}

/// Maps a serenity error onto the platform error taxonomy.
pub fn classify_discord_error(error: &serenity::Error) -> PlatformError {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => classify_response(
            response.status_code.as_u16(),
            response.error.code,
            &response.error.message,
        ),
        other => PlatformError::Rejected(other.to_string()),
    }
}

/// Maps an unsuccessful Discord API response onto the platform error taxonomy.
///
/// # Arguments
/// - `status` - HTTP status code
/// - `code` - Discord JSON error code
/// - `message` - Discord's error message, kept for unclassified errors
pub fn classify_response(status: u16, code: isize, message: &str) -> PlatformError {
    match (status, code) {
        (_, CODE_MISSING_PERMISSIONS) | (403, _) => PlatformError::Forbidden,
        (_, CODE_MAX_EMOJIS) => PlatformError::QuotaExceeded,
        (_, CODE_FILE_TOO_LARGE) | (413, _) => PlatformError::ImageTooLarge,
        _ => PlatformError::Rejected(message.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_permissions_is_forbidden() {
        assert_eq!(
            classify_response(403, CODE_MISSING_PERMISSIONS, "Missing Permissions"),
            PlatformError::Forbidden
        );
        assert_eq!(classify_response(403, 0, "Forbidden"), PlatformError::Forbidden);
    }

    #[test]
    fn emoji_slots_full_is_quota() {
        assert_eq!(
            classify_response(400, CODE_MAX_EMOJIS, "Maximum number of emojis reached (50)"),
            PlatformError::QuotaExceeded
        );
    }

    #[test]
    fn oversized_upload_is_image_too_large() {
        assert_eq!(
            classify_response(400, CODE_FILE_TOO_LARGE, "File cannot be larger than 256.0 kb."),
            PlatformError::ImageTooLarge
        );
        assert_eq!(
            classify_response(413, 0, "Request entity too large"),
            PlatformError::ImageTooLarge
        );
    }

    #[test]
    fn other_errors_keep_discord_message() {
        assert_eq!(
            classify_response(400, 50035, "Invalid Form Body"),
            PlatformError::Rejected("Invalid Form Body".to_string())
        );
    }

    #[test]
    fn non_http_errors_are_rejected() {
        let error = serenity::Error::Other("gateway closed");
        assert!(matches!(classify_discord_error(&error), PlatformError::Rejected(_)));
    }
}
