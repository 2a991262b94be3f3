//! Emoji import domain models.
//!
//! Provides the validated `EmojiName` along with the transient values passed between
//! the scraping, validation and registration steps of an import. None of these are
//! persisted.

use std::fmt;
use url::Url;

use crate::error::import::ImportError;

/// Longest name Discord accepts for a custom emoji.
pub const EMOJI_NAME_MAX_LEN: usize = 32;
/// Shortest name Discord accepts for a custom emoji.
pub const EMOJI_NAME_MIN_LEN: usize = 2;

/// Name used when nothing usable can be derived from the command.
const FALLBACK_NAME: &str = "emoji";

/// Custom emoji name restricted to Discord's rules.
///
/// Always 2 to 32 characters long and made only of ASCII letters, digits and
/// underscores. The only ways to build one are `sanitize` and `derive`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmojiName(String);

impl EmojiName {
    /// Cleans arbitrary text into an emoji name.
    ///
    /// Runs of disallowed characters collapse into a single `_`, leading and trailing
    /// underscores are trimmed and the result is cut to 32 characters. A single
    /// remaining character is padded with `_` to reach Discord's minimum length.
    ///
    /// # Arguments
    /// - `raw` - Text to clean (user argument, URL segment, alt text)
    ///
    /// # Returns
    /// - `Some(EmojiName)` - At least one allowed character survived
    /// - `None` - Nothing usable in the input
    pub fn sanitize(raw: &str) -> Option<Self> {
        let mut cleaned = String::with_capacity(raw.len());
        for c in raw.chars() {
            if c.is_ascii_alphanumeric() || c == '_' {
                cleaned.push(c);
            } else if !cleaned.ends_with('_') {
                cleaned.push('_');
            }
        }

        let mut name = cleaned.trim_matches('_').to_string();
        // ASCII only at this point, so byte truncation is safe
        name.truncate(EMOJI_NAME_MAX_LEN);
        let mut name = name.trim_end_matches('_').to_string();

        if name.is_empty() {
            return None;
        }
        while name.len() < EMOJI_NAME_MIN_LEN {
            name.push('_');
        }

        Some(Self(name))
    }

    /// Picks the emoji name for an import.
    ///
    /// Preference order: the explicit name from the command, then the last path segment
    /// of the source page URL (extension and numeric `1234-` id prefix removed), then the
    /// image's alt text, then a fixed fallback.
    pub fn derive(explicit: Option<&str>, source: &Url, alt: Option<&str>) -> Self {
        explicit
            .and_then(Self::sanitize)
            .or_else(|| name_from_url(source).and_then(|segment| Self::sanitize(&segment)))
            .or_else(|| alt.and_then(Self::sanitize))
            .unwrap_or_else(|| Self(FALLBACK_NAME.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmojiName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extracts the slug from an emoji page URL such as `https://emoji.gg/emoji/1234-pepe`.
fn name_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;

    let stem = match segment.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => segment,
    };

    let slug = match stem.split_once('-') {
        Some((prefix, rest)) if !rest.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) => {
            rest
        }
        _ => stem,
    };

    Some(slug.to_string())
}

/// Location of the emoji image found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Absolute image URL.
    pub url: Url,
    /// The image element's alt text, used as a naming fallback.
    pub alt: Option<String>,
}

/// Everything needed to register one emoji, assembled during an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiCandidate {
    pub source: Url,
    pub image: ImageReference,
    pub name: EmojiName,
}

/// An emoji successfully created in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedEmoji {
    pub id: u64,
    pub name: String,
    pub animated: bool,
}

/// Result of importing one source URL, as reported back to the invoker.
#[derive(Debug)]
pub struct ImportOutcome {
    /// The URL argument exactly as the user typed it.
    pub source: String,
    pub result: Result<ImportedEmoji, ImportError>,
}

impl ImportOutcome {
    pub fn user_message(&self) -> String {
        match &self.result {
            Ok(emoji) => format!("Emoji `{}` has been added to the server!", emoji.name),
            Err(err) => err.user_message(),
        }
    }
}
