use std::path::PathBuf;
use thiserror::Error;

/// Failures of a role allow-list backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the JSON document failed.
    #[error("Failed to access role config file {path}: {source}")]
    Io {
        /// Path of the backing document
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The JSON document exists but does not have the expected shape.
    #[error("Role config file {path} is malformed: {source}")]
    Json {
        /// Path of the backing document
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Database backend error.
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),

    /// A stored id could not be parsed back into a snowflake.
    #[error("Stored id '{0}' is not a valid Discord id")]
    CorruptId(String),
}
