//! Failure taxonomy of the emoji import workflow.
//!
//! Every step of an import reports one of these tagged reasons. They are handled at the
//! command layer and rendered with `user_message`, so none of them escape a handler.

use std::time::Duration;
use thiserror::Error;

use crate::error::store::StoreError;

/// Why an import was refused before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The guild has no allow-list configured; imports fail closed.
    NoRolesConfigured,
    /// The invoker holds none of the allowed roles.
    MissingRole,
    /// Command was used outside of a guild.
    NotInGuild,
}

/// Network-level failure while fetching a page or an image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// The body grew past the byte ceiling for this kind of download.
    #[error("response is larger than {limit} bytes")]
    TooLarge { limit: u64 },

    /// The request never produced a response (DNS, TLS, timeout, reset...).
    #[error("request failed: {0}")]
    Network(String),
}

/// The downloaded payload is not an acceptable emoji image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("the image is empty")]
    Empty,

    #[error("the image is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("the server says it is `{0}`, not an image")]
    UnsupportedContentType(String),

    #[error("the file is not a PNG, JPEG, GIF or WebP image")]
    SignatureMismatch,
}

/// Discord refused to create the emoji.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("missing permission to manage emojis")]
    Forbidden,

    #[error("emoji slots are full")]
    QuotaExceeded,

    #[error("an emoji named `{0}` already exists")]
    DuplicateName(String),

    #[error("the image is too large for Discord")]
    ImageTooLarge,

    #[error("{0}")]
    Rejected(String),
}

/// Tagged failure reason for a single import.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("permission denied: {0:?}")]
    PermissionDenied(DenialReason),

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("invalid url `{0}`")]
    InvalidUrl(String),

    #[error("fetch failed: {0}")]
    FetchError(#[from] FetchError),

    #[error("emoji image not found on the page")]
    NotFound,

    #[error("invalid image: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("emoji creation rejected: {0}")]
    PlatformError(#[from] PlatformError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ImportError {
    /// Renders the failure as the reply shown to the invoking user.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied(DenialReason::NoRolesConfigured) => {
                "No roles have been set to use this command.".to_string()
            }
            Self::PermissionDenied(DenialReason::MissingRole) => {
                "You do not have permission to use this command.".to_string()
            }
            Self::PermissionDenied(DenialReason::NotInGuild) => {
                "This command can only be used in a server.".to_string()
            }
            Self::RateLimited { retry_after } => format!(
                "You are importing emojis too quickly. Try again in {} seconds.",
                wait_secs(*retry_after)
            ),
            Self::InvalidUrl(url) => format!("`{}` is not a valid http(s) URL.", url),
            Self::FetchError(err) => format!("Failed to fetch the page or image: {}.", err),
            Self::NotFound => "Could not find the emoji on the webpage.".to_string(),
            Self::ValidationError(err) => format!("Failed to download the emoji: {}.", err),
            Self::PlatformError(PlatformError::Forbidden) => {
                "Bot does not have permission to create emojis.".to_string()
            }
            Self::PlatformError(err) => format!("Failed to create emoji: {}.", err),
            Self::Store(_) => {
                "Something went wrong while reading the role configuration.".to_string()
            }
        }
    }
}

/// Whole seconds to wait, rounded up so the user never retries too early.
fn wait_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}
