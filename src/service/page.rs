//! Locating the emoji image on a web page.
//!
//! Site-specific knowledge lives here and nowhere else: which CSS selectors mark the
//! emoji image. The markup is parsed synchronously in `find_emoji_image` so the parsed
//! document is never held across an await point.

use scraper::{Html, Selector};
use serenity::async_trait;
use std::sync::Arc;
use url::Url;

use crate::{
    error::{
        config::ConfigError,
        import::{FetchError, ImportError},
    },
    model::emoji::ImageReference,
    service::http::HttpFetcher,
};

/// Selectors tried in order when none are configured.
///
/// The first matches the current emoji page layout, the second an older one that tags
/// the image itself.
pub const DEFAULT_IMAGE_SELECTORS: &[&str] = &["div.card-body.emoji-pad img", "img.emoji-img"];

/// Largest emoji page downloaded when none is configured.
pub const DEFAULT_MAX_PAGE_BYTES: u64 = 2 * 1024 * 1024;

#[async_trait]
pub trait EmojiLocator: Send + Sync {
    /// Fetches `page_url` and returns the absolute URL of its emoji image.
    ///
    /// Relative image links resolve against the URL that finally served the page, which
    /// differs from `page_url` when the request was redirected.
    ///
    /// # Returns
    /// - `Ok(ImageReference)` - Image found and resolved
    /// - `Err(ImportError::FetchError)` - Page could not be fetched, answered non-2xx or
    ///   exceeded the page size limit
    /// - `Err(ImportError::NotFound)` - No selector matched an image with a usable `src`
    async fn locate_emoji_image(&self, page_url: &Url) -> Result<ImageReference, ImportError>;
}

/// Scrapes emoji pages with a list of CSS selectors.
pub struct PageScraper {
    fetcher: Arc<dyn HttpFetcher>,
    selectors: Vec<Selector>,
    max_page_bytes: u64,
}

impl PageScraper {
    /// Creates a scraper, compiling the given selectors.
    ///
    /// # Arguments
    /// - `fetcher` - Used to download pages
    /// - `selectors` - CSS selectors tried in order; must not be empty
    /// - `max_page_bytes` - Pages larger than this are abandoned unparsed
    ///
    /// # Returns
    /// - `Ok(PageScraper)` - All selectors compiled
    /// - `Err(ConfigError::InvalidEnvVar)` - A selector is not valid CSS, or none given
    pub fn new<S: AsRef<str>>(
        fetcher: Arc<dyn HttpFetcher>,
        selectors: &[S],
        max_page_bytes: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            selectors: compile_selectors(selectors)?,
            max_page_bytes,
        })
    }
}

/// Compiles CSS selectors, reporting the first invalid one.
pub fn compile_selectors<S: AsRef<str>>(selectors: &[S]) -> Result<Vec<Selector>, ConfigError> {
    if selectors.is_empty() {
        return Err(invalid_selector("at least one selector is required".to_string()));
    }

    selectors
        .iter()
        .map(|s| {
            Selector::parse(s.as_ref())
                .map_err(|e| invalid_selector(format!("`{}`: {}", s.as_ref(), e)))
        })
        .collect()
}

fn invalid_selector(reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name: "EMOJI_IMAGE_SELECTORS".to_string(),
        reason,
    }
}

#[async_trait]
impl EmojiLocator for PageScraper {
    async fn locate_emoji_image(&self, page_url: &Url) -> Result<ImageReference, ImportError> {
        let response = self
            .fetcher
            .fetch(page_url, Some(self.max_page_bytes))
            .await?;
        if response.exceeded_limit {
            tracing::debug!(
                "Page {} exceeds {} bytes, not parsing",
                page_url,
                self.max_page_bytes
            );
            return Err(FetchError::TooLarge {
                limit: self.max_page_bytes,
            }
            .into());
        }

        let html = String::from_utf8_lossy(&response.body);
        let base = &response.final_url;

        let image = find_emoji_image(&html, base, &self.selectors).ok_or_else(|| {
            tracing::debug!("No emoji image matched on {}", page_url);
            ImportError::NotFound
        })?;

        tracing::debug!("Found emoji image {} on {}", image.url, page_url);

        Ok(image)
    }
}

/// Finds the first element matching any selector, in selector order, whose `src`
/// resolves to an http(s) URL.
///
/// Relative, root-relative and protocol-relative `src` values are resolved against
/// `page_url`.
pub fn find_emoji_image(
    html: &str,
    page_url: &Url,
    selectors: &[Selector],
) -> Option<ImageReference> {
    let document = Html::parse_document(html);

    selectors.iter().find_map(|selector| {
        document.select(selector).find_map(|element| {
            let src = element.value().attr("src")?.trim();
            if src.is_empty() {
                return None;
            }

            let url = page_url.join(src).ok()?;
            if !matches!(url.scheme(), "http" | "https") {
                return None;
            }

            let alt = element
                .value()
                .attr("alt")
                .map(str::trim)
                .filter(|alt| !alt.is_empty())
                .map(str::to_string);

            Some(ImageReference { url, alt })
        })
    })
}
