//! In-memory fakes for the import workflow's network collaborators.

use serenity::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::{
    data::role::{JsonRoleStore, RoleStore},
    error::import::{FetchError, ImportError, PlatformError, ValidationError},
    model::{
        emoji::{EmojiName, ImportedEmoji},
        image::{ImageFormat, ValidatedImage},
        request::ImportRequest,
    },
    service::{
        access::AccessPolicy,
        clock::ManualClock,
        http::{FetchedResponse, HttpFetcher},
        image::{ImageFetcher, DEFAULT_MAX_IMAGE_BYTES},
        import::{EmojiImportService, ImportDependencies},
        page::{PageScraper, DEFAULT_IMAGE_SELECTORS, DEFAULT_MAX_PAGE_BYTES},
        platform::EmojiPlatform,
        rate_limit::SlidingWindowRateLimiter,
    },
};
use test_utils::fixture::{image, page};

mod http;

const GUILD: u64 = 10;
const ALLOWED_ROLE: u64 = 100;
const OTHER_ROLE: u64 = 200;
const USER: u64 = 1;
const OWNER: u64 = 99;

/// Serves canned responses keyed by URL and records every request.
///
/// Unknown URLs answer 404. Redirects are followed one hop, like a real client would
/// report the final URL.
#[derive(Default)]
struct FakeFetcher {
    responses: HashMap<String, Result<FetchedResponse, FetchError>>,
    redirects: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn html(mut self, url: &str, html: String) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(FetchedResponse::new(
                Url::parse(url).unwrap(),
                Some("text/html; charset=utf-8"),
                html.into_bytes(),
            )),
        );
        self
    }

    fn body(mut self, url: &str, content_type: Option<&str>, body: Vec<u8>) -> Self {
        self.responses.insert(
            url.to_string(),
            Ok(FetchedResponse::new(Url::parse(url).unwrap(), content_type, body)),
        );
        self
    }

    fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    fn fail(mut self, url: &str, error: FetchError) -> Self {
        self.responses.insert(url.to_string(), Err(error));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetcher for FakeFetcher {
    async fn fetch(
        &self,
        url: &Url,
        max_bytes: Option<u64>,
    ) -> Result<FetchedResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        let target = self
            .redirects
            .get(url.as_str())
            .map_or(url.as_str(), String::as_str);
        let mut response = self
            .responses
            .get(target)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))?;

        if let Some(limit) = max_bytes {
            if response.body.len() as u64 > limit {
                response.body.truncate(limit as usize + 1);
                response.exceeded_limit = true;
            }
        }

        Ok(response)
    }
}

/// Records created emojis; optionally refuses every request.
#[derive(Default)]
struct FakePlatform {
    failure: Option<PlatformError>,
    created: Mutex<Vec<(u64, String, ImageFormat)>>,
}

impl FakePlatform {
    fn failing(error: PlatformError) -> Self {
        Self {
            failure: Some(error),
            created: Mutex::new(Vec::new()),
        }
    }

    fn created(&self) -> Vec<(u64, String, ImageFormat)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmojiPlatform for FakePlatform {
    async fn create_emoji(
        &self,
        guild_id: u64,
        name: &EmojiName,
        image: &ValidatedImage,
    ) -> Result<ImportedEmoji, PlatformError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let mut created = self.created.lock().unwrap();
        created.push((guild_id, name.to_string(), image.format));

        Ok(ImportedEmoji {
            id: 1000 + created.len() as u64,
            name: name.to_string(),
            animated: image.format == ImageFormat::Gif,
        })
    }
}

/// Import service wired to fakes, with handles to inspect them.
struct Harness {
    service: EmojiImportService,
    fetcher: Arc<FakeFetcher>,
    platform: Arc<FakePlatform>,
    roles: Arc<JsonRoleStore>,
    clock: Arc<ManualClock>,
    _dir: tempfile::TempDir,
}

impl Harness {
    /// Builds a service allowing 5 imports per minute, with `ALLOWED_ROLE` configured in
    /// `GUILD` and `OWNER` as bot owner.
    async fn new(fetcher: FakeFetcher, platform: FakePlatform) -> Self {
        let harness = Self::unconfigured(fetcher, platform).await;
        harness.roles.add_role(GUILD, ALLOWED_ROLE).await.unwrap();
        harness
    }

    /// Same as `new` but with an empty allow-list.
    async fn unconfigured(fetcher: FakeFetcher, platform: FakePlatform) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let roles = Arc::new(
            JsonRoleStore::open(dir.path().join("roles_config.json"))
                .await
                .unwrap(),
        );
        let fetcher = Arc::new(fetcher);
        let platform = Arc::new(platform);
        let clock = Arc::new(ManualClock::new(chrono::Utc::now()));

        let service = EmojiImportService::new(ImportDependencies {
            roles: roles.clone(),
            limiter: Arc::new(SlidingWindowRateLimiter::new(
                5,
                chrono::Duration::seconds(60),
            )),
            locator: Arc::new(
                PageScraper::new(
                    fetcher.clone(),
                    DEFAULT_IMAGE_SELECTORS,
                    DEFAULT_MAX_PAGE_BYTES,
                )
                .unwrap(),
            ),
            images: ImageFetcher::new(fetcher.clone(), DEFAULT_MAX_IMAGE_BYTES),
            platform: platform.clone(),
            access: AccessPolicy::new([OWNER]),
            clock: clock.clone(),
        });

        Self {
            service,
            fetcher,
            platform,
            roles,
            clock,
            _dir: dir,
        }
    }
}

fn member_request() -> ImportRequest {
    ImportRequest::new(GUILD, USER, vec![OTHER_ROLE, ALLOWED_ROLE])
}
