//! Emoji import workflow and its collaborators.
//!
//! `import::EmojiImportService` runs the pipeline. Every step it depends on sits behind a
//! narrow trait so the bot wires in the network-backed implementations while tests use
//! in-memory fakes:
//!
//! - `clock::Clock` - time source for rate limiting
//! - `rate_limit::RateLimiter` - per-user sliding window
//! - `http::HttpFetcher` - raw page and image downloads
//! - `page::EmojiLocator` - finds the emoji image on a page
//! - `platform::EmojiPlatform` - creates the emoji on Discord

pub mod access;
pub mod clock;
pub mod http;
pub mod image;
pub mod import;
pub mod page;
pub mod platform;
pub mod rate_limit;

#[cfg(test)]
mod test;
