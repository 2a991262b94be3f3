use std::sync::Arc;

use crate::{
    config::Config,
    data::role::{DatabaseRoleStore, JsonRoleStore, RoleStore},
    error::AppError,
};

/// Most redirects followed when fetching a page or an image.
const MAX_REDIRECTS: usize = 3;

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the
/// allow-list table exists.
///
/// # Arguments
/// - `database_url` - SQLite connection string
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(
    database_url: &str,
) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Opens the role allow-list backend selected by configuration.
///
/// Uses the database when `DATABASE_URL` is set, otherwise the JSON document at
/// `ROLE_CONFIG_PATH`.
pub async fn build_role_store(config: &Config) -> Result<Arc<dyn RoleStore>, AppError> {
    match &config.database_url {
        Some(database_url) => {
            let db = connect_to_database(database_url).await?;
            tracing::info!("Using database role allow-list");
            Ok(Arc::new(DatabaseRoleStore::new(db)))
        }
        None => {
            let store = JsonRoleStore::open(&config.role_config_path).await?;
            tracing::info!("Using JSON role allow-list at {}", store.path().display());
            Ok(Arc::new(store))
        }
    }
}

/// Builds the HTTP client used to fetch emoji pages and images.
///
/// Every request carries the configured timeout, and redirects are capped so a page
/// cannot bounce the bot around indefinitely.
pub fn setup_reqwest_client(config: &Config) -> Result<reqwest::Client, AppError> {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(config.fetch_timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()?;

    Ok(client)
}
