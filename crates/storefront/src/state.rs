//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::middleware::LookupRateLimiter;
use crate::token::TokenCodec;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The token codec and rate limiter are
/// constructed once from configuration so handlers never touch raw
/// secrets.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    tokens: TokenCodec,
    lookup_limiter: LookupRateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let tokens = TokenCodec::new(config.token_secret.clone(), config.is_secure());
        let lookup_limiter = LookupRateLimiter::new(config.order_lookup_max_per_hour);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tokens,
                lookup_limiter,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the signed-token codec.
    #[must_use]
    pub fn tokens(&self) -> &TokenCodec {
        &self.inner.tokens
    }

    /// Get a reference to the order lookup rate limiter.
    #[must_use]
    pub fn lookup_limiter(&self) -> &LookupRateLimiter {
        &self.inner.lookup_limiter
    }
}
