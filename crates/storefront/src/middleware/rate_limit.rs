//! Per-IP rate limiting for the order lookup endpoint.
//!
//! Lookup takes personal details and returns order history, so it gets a
//! tight hourly per-IP budget. Everything else in the storefront is
//! token-scoped and stays unlimited.

use std::net::IpAddr;
use std::num::NonZeroU32;

use governor::{DefaultKeyedRateLimiter, Quota};

use crate::error::AppError;

pub struct LookupRateLimiter {
    limiter: DefaultKeyedRateLimiter<IpAddr>,
}

impl LookupRateLimiter {
    /// Allow up to `max_per_hour` lookups per client IP. A zero cap is
    /// treated as one.
    #[must_use]
    pub fn new(max_per_hour: u32) -> Self {
        let cap = NonZeroU32::new(max_per_hour).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: DefaultKeyedRateLimiter::keyed(Quota::per_hour(cap)),
        }
    }

    /// Spend one lookup attempt for `ip`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::RateLimited` once the hourly budget is exhausted.
    pub fn check(&self, ip: IpAddr) -> Result<(), AppError> {
        self.limiter.check_key(&ip).map_err(|_| {
            tracing::warn!(%ip, "order lookup rate limit exceeded");
            AppError::RateLimited
        })
    }
}

impl std::fmt::Debug for LookupRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupRateLimiter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn test_cap_applies_per_ip() {
        let limiter = LookupRateLimiter::new(3);
        let first = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 1));
        let second = IpAddr::V4(Ipv4Addr::new(198, 51, 100, 2));

        for _ in 0..3 {
            assert!(limiter.check(first).is_ok());
        }
        assert!(matches!(limiter.check(first), Err(AppError::RateLimited)));

        // A different IP has its own budget.
        assert!(limiter.check(second).is_ok());
    }

    #[test]
    fn test_zero_cap_still_allows_one() {
        let limiter = LookupRateLimiter::new(0);
        let ip = IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9));
        assert!(limiter.check(ip).is_ok());
        assert!(limiter.check(ip).is_err());
    }
}
