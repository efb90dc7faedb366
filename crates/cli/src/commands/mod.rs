//! CLI command implementations.

pub mod migrate;
pub mod order;
pub mod shipping;

use secrecy::SecretString;
use sqlx::PgPool;

use zed_storefront::db::RepositoryError;

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Set ZED_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Connect to the storefront database named in the environment.
pub async fn connect() -> Result<PgPool, CliError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("ZED_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CliError::MissingDatabaseUrl)?;

    Ok(zed_storefront::db::create_pool(&SecretString::from(url)).await?)
}
