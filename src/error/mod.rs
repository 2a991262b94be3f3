//! Error types for startup and the emoji import workflow.
//!
//! `AppError` is the top-level error returned while the bot is being configured and
//! started. Errors raised while handling a single command never reach it: they are
//! `ImportError` values converted into a plain-text reply at the command layer.

pub mod config;
pub mod import;
pub mod store;

use thiserror::Error;

use crate::error::{config::ConfigError, store::StoreError};

/// Top-level application error type.
///
/// Aggregates the errors that can abort startup or terminate the bot. Most variants use
/// `#[from]` for automatic conversion with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Role allow-list backend failed to load.
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Database connection or migration error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// HTTP client construction error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
