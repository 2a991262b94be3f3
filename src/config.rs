use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    error::{config::ConfigError, AppError},
    service::{
        image::DEFAULT_MAX_IMAGE_BYTES,
        page::{DEFAULT_IMAGE_SELECTORS, DEFAULT_MAX_PAGE_BYTES},
    },
};

const DEFAULT_ROLE_CONFIG_PATH: &str = "roles_config.json";
const DEFAULT_RATE_LIMIT_MAX: usize = 5;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const MAX_RATE_LIMIT_WINDOW_SECS: u64 = 24 * 60 * 60;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_COMMAND_PREFIX: &str = "!";

pub struct Config {
    pub discord_bot_token: String,

    /// JSON allow-list document, used when `database_url` is unset.
    pub role_config_path: PathBuf,
    /// SQLite allow-list database; takes precedence over the JSON document.
    pub database_url: Option<String>,

    pub rate_limit_max: usize,
    pub rate_limit_window: Duration,

    pub max_image_bytes: u64,
    pub max_page_bytes: u64,
    pub image_selectors: Vec<String>,
    pub fetch_timeout: Duration,

    pub bot_owner_ids: Vec<u64>,
    pub command_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Builds the configuration from a variable lookup function.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let rate_limit_max = parse_or(&var, "EMOJI_RATE_LIMIT_MAX", DEFAULT_RATE_LIMIT_MAX)?;
        if rate_limit_max == 0 {
            return Err(invalid("EMOJI_RATE_LIMIT_MAX", "must be at least 1"));
        }

        let window_secs = parse_or(
            &var,
            "EMOJI_RATE_LIMIT_WINDOW_SECS",
            DEFAULT_RATE_LIMIT_WINDOW_SECS,
        )?;
        if !(1..=MAX_RATE_LIMIT_WINDOW_SECS).contains(&window_secs) {
            return Err(invalid(
                "EMOJI_RATE_LIMIT_WINDOW_SECS",
                "must be between 1 and 86400",
            ));
        }

        let max_image_bytes = parse_or(&var, "EMOJI_MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?;
        if max_image_bytes == 0 {
            return Err(invalid("EMOJI_MAX_IMAGE_BYTES", "must be at least 1"));
        }

        let max_page_bytes = parse_or(&var, "EMOJI_MAX_PAGE_BYTES", DEFAULT_MAX_PAGE_BYTES)?;
        if max_page_bytes == 0 {
            return Err(invalid("EMOJI_MAX_PAGE_BYTES", "must be at least 1"));
        }

        let fetch_timeout_secs =
            parse_or(&var, "FETCH_TIMEOUT_SECS", DEFAULT_FETCH_TIMEOUT_SECS)?;
        if fetch_timeout_secs == 0 {
            return Err(invalid("FETCH_TIMEOUT_SECS", "must be at least 1"));
        }

        let image_selectors = match var("EMOJI_IMAGE_SELECTORS") {
            Some(raw) => split_list(&raw),
            None => DEFAULT_IMAGE_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let bot_owner_ids = match var("BOT_OWNER_IDS") {
            Some(raw) => split_list(&raw)
                .iter()
                .map(|id| {
                    id.parse::<u64>().map_err(|_| {
                        invalid("BOT_OWNER_IDS", &format!("`{}` is not a user id", id))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            discord_bot_token: var("DISCORD_BOT_TOKEN")
                .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            role_config_path: var("ROLE_CONFIG_PATH")
                .unwrap_or_else(|| DEFAULT_ROLE_CONFIG_PATH.to_string())
                .into(),
            database_url: var("DATABASE_URL"),
            rate_limit_max,
            rate_limit_window: Duration::from_secs(window_secs),
            max_image_bytes,
            max_page_bytes,
            image_selectors,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            bot_owner_ids,
            command_prefix: var("COMMAND_PREFIX")
                .map(|p| p.trim().to_string())
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
        })
    }
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(name, &e.to_string())),
        None => Ok(default),
    }
}

/// Splits a comma-separated list, dropping blank entries.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
