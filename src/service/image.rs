//! Emoji image download and validation.

use std::sync::Arc;
use url::Url;

use crate::{
    error::import::{ImportError, ValidationError},
    model::image::{ImageFormat, ValidatedImage},
    service::http::{FetchedResponse, HttpFetcher},
};

/// Discord's upload limit for a custom emoji.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 256 * 1024;

/// Downloads emoji images and checks they are fit for upload.
pub struct ImageFetcher {
    fetcher: Arc<dyn HttpFetcher>,
    max_bytes: u64,
}

impl ImageFetcher {
    /// # Arguments
    /// - `fetcher` - Used to download images
    /// - `max_bytes` - Largest image accepted
    pub fn new(fetcher: Arc<dyn HttpFetcher>, max_bytes: u64) -> Self {
        Self { fetcher, max_bytes }
    }

    /// Downloads the image at `url` and validates it.
    ///
    /// Reading stops as soon as the body passes the size ceiling.
    ///
    /// # Returns
    /// - `Ok(ValidatedImage)` - Image passed every check
    /// - `Err(ImportError::FetchError)` - Download failed or answered non-2xx
    /// - `Err(ImportError::ValidationError)` - See `validate_image`
    pub async fn fetch_and_validate(&self, url: &Url) -> Result<ValidatedImage, ImportError> {
        let response = self.fetcher.fetch(url, Some(self.max_bytes)).await?;
        let image = validate_image(response, self.max_bytes)?;

        tracing::debug!(
            "Downloaded {} ({} bytes, {})",
            url,
            image.len(),
            image.format.mime()
        );

        Ok(image)
    }
}

/// Checks a downloaded image, stopping at the first failure.
///
/// Order:
/// 1. existence - the body is not empty
/// 2. size - neither the body nor the declared length exceeds `max_bytes`
/// 3. declared type - a `Content-Type`, when present, is `image/*`
/// 4. signature - the bytes start with a PNG, JPEG, GIF or WebP magic number
///
/// A missing `Content-Type` passes step 3; step 4 decides on the bytes alone.
pub fn validate_image(
    response: FetchedResponse,
    max_bytes: u64,
) -> Result<ValidatedImage, ValidationError> {
    if response.body.is_empty() && !response.exceeded_limit {
        return Err(ValidationError::Empty);
    }

    let size = response
        .content_length
        .unwrap_or(0)
        .max(response.body.len() as u64);
    if response.exceeded_limit || size > max_bytes {
        return Err(ValidationError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    if let Some(content_type) = response.content_type.as_deref() {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !mime.starts_with("image/") {
            return Err(ValidationError::UnsupportedContentType(mime));
        }
    }

    let format = ImageFormat::sniff(&response.body).ok_or(ValidationError::SignatureMismatch)?;

    Ok(ValidatedImage {
        bytes: response.body,
        format,
    })
}
