//! HTTP client module
//!
//! The production transport: a reqwest client with optional retries,
//! rate limiting, backoff strategies and static authentication.
//!
//! # Features
//!
//! - **Retries**: Off by default; constant, linear or exponential backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Integration with the auth module
//! - **Query Encoding**: Null values dropped, arrays sent as repeated keys

mod client;
mod rate_limit;

pub use client::{query_pairs, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RetryPolicy};
pub use rate_limit::{RateLimit, RateLimiter};
