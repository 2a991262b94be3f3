//! Emoji import orchestration.
//!
//! Runs one import as a fixed sequence, stopping at the first failure:
//!
//! 1. permission check against the guild's role allow-list (owners bypass it)
//! 2. per-user rate limit
//! 3. source URL validation
//! 4. page fetch and image lookup
//! 5. image download and validation
//! 6. name derivation
//! 7. emoji creation on Discord
//!
//! Denials in steps 1 and 2 happen before any network call.

use std::sync::Arc;
use url::Url;

use crate::{
    data::role::RoleStore,
    error::import::{DenialReason, ImportError},
    model::{
        emoji::{EmojiCandidate, EmojiName, ImportOutcome, ImportedEmoji},
        request::ImportRequest,
    },
    service::{
        access::AccessPolicy,
        clock::Clock,
        image::ImageFetcher,
        page::EmojiLocator,
        platform::EmojiPlatform,
        rate_limit::{RateDecision, RateLimiter},
    },
};

/// Collaborators of the import workflow.
pub struct ImportDependencies {
    pub roles: Arc<dyn RoleStore>,
    pub limiter: Arc<dyn RateLimiter>,
    pub locator: Arc<dyn EmojiLocator>,
    pub images: ImageFetcher,
    pub platform: Arc<dyn EmojiPlatform>,
    pub access: AccessPolicy,
    pub clock: Arc<dyn Clock>,
}

/// Imports emojis from web pages into guilds.
pub struct EmojiImportService {
    roles: Arc<dyn RoleStore>,
    limiter: Arc<dyn RateLimiter>,
    locator: Arc<dyn EmojiLocator>,
    images: ImageFetcher,
    platform: Arc<dyn EmojiPlatform>,
    access: AccessPolicy,
    clock: Arc<dyn Clock>,
}

impl EmojiImportService {
    pub fn new(deps: ImportDependencies) -> Self {
        Self {
            roles: deps.roles,
            limiter: deps.limiter,
            locator: deps.locator,
            images: deps.images,
            platform: deps.platform,
            access: deps.access,
            clock: deps.clock,
        }
    }

    /// Imports the emoji shown on `source` into the requester's guild.
    ///
    /// # Arguments
    /// - `request` - Invoking user, their roles and the target guild
    /// - `source` - Emoji page URL as typed by the user
    /// - `name` - Explicit emoji name; derived from the page when `None`
    ///
    /// # Returns
    /// - `Ok(ImportedEmoji)` - Emoji created
    /// - `Err(ImportError)` - Tagged reason of the first failing step
    pub async fn import_emoji(
        &self,
        request: &ImportRequest,
        source: &str,
        name: Option<&str>,
    ) -> Result<ImportedEmoji, ImportError> {
        self.authorize(request).await?;
        self.import_authorized(request, source, name).await
    }

    /// Imports several emojis for one invocation.
    ///
    /// Permission is checked once for the whole batch. Each URL then goes through its own
    /// rate-limit check and pipeline; a failing URL does not stop the others.
    ///
    /// # Returns
    /// - `Ok(Vec<ImportOutcome>)` - One outcome per source, in order
    /// - `Err(ImportError::PermissionDenied)` - Invoker may not import in this guild
    /// - `Err(ImportError::Store)` - Allow-list could not be read
    pub async fn import_many(
        &self,
        request: &ImportRequest,
        sources: &[String],
    ) -> Result<Vec<ImportOutcome>, ImportError> {
        self.authorize(request).await?;

        let mut outcomes = Vec::with_capacity(sources.len());
        for source in sources {
            let result = self.import_authorized(request, source, None).await;
            outcomes.push(ImportOutcome {
                source: source.clone(),
                result,
            });
        }

        Ok(outcomes)
    }

    /// Checks the invoker against the guild's allow-list. Fails closed.
    async fn authorize(&self, request: &ImportRequest) -> Result<(), ImportError> {
        if self.access.is_owner(request.user_id) {
            return Ok(());
        }

        let allow_list = self.roles.allow_list(request.guild_id).await?;
        if !allow_list.is_configured() {
            return Err(ImportError::PermissionDenied(DenialReason::NoRolesConfigured));
        }
        if !allow_list.permits(&request.role_ids) {
            return Err(ImportError::PermissionDenied(DenialReason::MissingRole));
        }

        Ok(())
    }

    async fn import_authorized(
        &self,
        request: &ImportRequest,
        source: &str,
        name: Option<&str>,
    ) -> Result<ImportedEmoji, ImportError> {
        // A mistyped URL does not spend a slot
        let source = parse_source_url(source)?;

        let now = self.clock.now();
        if let RateDecision::Limited { retry_after } =
            self.limiter.try_acquire(request.user_id, now).await
        {
            tracing::debug!(
                "User {} rate limited for {:?}",
                request.user_id,
                retry_after
            );
            return Err(ImportError::RateLimited { retry_after });
        }

        let image = self.locator.locate_emoji_image(&source).await?;
        let validated = self.images.fetch_and_validate(&image.url).await?;
        let name = EmojiName::derive(name, &source, image.alt.as_deref());

        let candidate = EmojiCandidate {
            source,
            image,
            name,
        };

        let emoji = self
            .platform
            .create_emoji(request.guild_id, &candidate.name, &validated)
            .await?;

        tracing::info!(
            "Imported emoji {} ({}) into guild {} from {} for user {}",
            emoji.name,
            emoji.id,
            request.guild_id,
            candidate.source,
            request.user_id
        );

        Ok(emoji)
    }
}

/// Parses a user-supplied page URL.
///
/// Angle brackets, which Discord users add to suppress link previews, are stripped.
///
/// # Returns
/// - `Ok(Url)` - Absolute http(s) URL with a host
/// - `Err(ImportError::InvalidUrl)` - Anything else
pub fn parse_source_url(source: &str) -> Result<Url, ImportError> {
    let trimmed = source
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>');

    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => Ok(url),
        _ => Err(ImportError::InvalidUrl(source.trim().to_string())),
    }
}
