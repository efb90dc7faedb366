//! Database operations for the storefront `PostgreSQL` instance.
//!
//! ## Tables
//!
//! - `product`, `product_image`, `product_size` - the catalog; read-only
//!   here, written by out-of-band tooling
//! - `"order"`, `order_item` - committed orders with line-item snapshots
//! - `setting` - mutable store-wide settings (shipping fee)
//!
//! Guest session state is deliberately absent: carts, saved checkout
//! profiles, and order-id lists live in signed client-held tokens
//! (see [`crate::token`]).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p zed-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod orders;
pub mod products;
pub mod settings;

pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Error type shared by all repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// The requested change conflicts with current state
    /// (e.g. an illegal order status transition).
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
