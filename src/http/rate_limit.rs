//! Client-side rate limiting
//!
//! A token bucket (governor) shared by every request of one client.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectLimiter = Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// Requests allowed per second, and how many may be sent back to back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Sustained requests per second
    pub per_second: u32,
    /// Bucket size
    pub burst: u32,
}

impl RateLimit {
    /// Create a rate limit
    pub fn new(per_second: u32, burst: u32) -> Self {
        Self { per_second, burst }
    }

    /// Steady rate with a burst of one second of traffic
    pub fn per_second(per_second: u32) -> Self {
        Self::new(per_second, per_second)
    }

    /// Zero values are clamped to one
    fn quota(self) -> Quota {
        let rate = NonZeroU32::new(self.per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst).unwrap_or(NonZeroU32::MIN);
        Quota::per_second(rate).allow_burst(burst)
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limit: RateLimit,
    bucket: Arc<DirectLimiter>,
}

impl RateLimiter {
    /// Create a limiter enforcing `limit`
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            bucket: Arc::new(Governor::direct(limit.quota())),
        }
    }

    /// The enforced limit
    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Take one token, waiting for the bucket to refill if it is empty
    ///
    /// Returns whether the caller had to wait.
    pub async fn acquire(&self) -> bool {
        if self.bucket.check().is_ok() {
            return false;
        }
        self.bucket.until_ready().await;
        true
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RateLimiter").field(&self.limit).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_constructors() {
        assert_eq!(RateLimit::per_second(4), RateLimit::new(4, 4));
        assert_eq!(RateLimiter::new(RateLimit::new(2, 8)).limit().burst, 8);
    }

    #[test]
    fn test_burst_is_served_without_waiting() {
        let limiter = RateLimiter::new(RateLimit::new(50, 5));
        tokio_test::block_on(async {
            for _ in 0..5 {
                assert!(!limiter.acquire().await);
            }
            // Bucket empty: the next token is 20ms away
            assert!(limiter.acquire().await);
        });
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let limiter = RateLimiter::new(RateLimit::new(0, 0));
        assert!(!tokio_test::block_on(limiter.acquire()));
    }
}
