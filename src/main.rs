mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;

use serenity::http::Http;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::AppError,
    scheduler::rate_limit_sweep,
    service::{
        access::AccessPolicy,
        clock::{Clock, SystemClock},
        http::{HttpFetcher, ReqwestFetcher},
        image::ImageFetcher,
        import::{EmojiImportService, ImportDependencies},
        page::PageScraper,
        platform::SerenityEmojiPlatform,
        rate_limit::{RateLimiter, SlidingWindowRateLimiter},
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let roles = startup::build_role_store(&config).await?;
    let http_client = startup::setup_reqwest_client(&config)?;
    let fetcher: Arc<dyn HttpFetcher> = Arc::new(ReqwestFetcher::new(http_client));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let limiter: Arc<dyn RateLimiter> = Arc::new(SlidingWindowRateLimiter::new(
        config.rate_limit_max,
        chrono::Duration::seconds(config.rate_limit_window.as_secs() as i64),
    ));
    let access = AccessPolicy::new(config.bot_owner_ids.iter().copied());

    // Separate from the gateway client's HTTP client, which only exists once the
    // handler (and therefore this service) has been built
    let discord_http = Arc::new(Http::new(&config.discord_bot_token));

    let import = EmojiImportService::new(ImportDependencies {
        roles: roles.clone(),
        limiter: limiter.clone(),
        locator: Arc::new(PageScraper::new(
            fetcher.clone(),
            config.image_selectors.as_slice(),
            config.max_page_bytes,
        )?),
        images: ImageFetcher::new(fetcher, config.max_image_bytes),
        platform: Arc::new(SerenityEmojiPlatform::new(discord_http)),
        access: access.clone(),
        clock: clock.clone(),
    });

    let state = AppState::new(roles, Arc::new(import), access, &config.command_prefix);

    tracing::info!(
        "Allowing {} imports per {}s per user, images up to {} bytes",
        config.rate_limit_max,
        config.rate_limit_window.as_secs(),
        config.max_image_bytes
    );

    // Start rate limit sweep scheduler
    tokio::spawn(async move {
        if let Err(e) = rate_limit_sweep::start_scheduler(limiter, clock).await {
            tracing::error!("Rate limit sweep scheduler error: {}", e);
        }
    });

    let client = bot::start::init_bot(&config, state).await?;

    bot::start::start_bot(client).await
}
