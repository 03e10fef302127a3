//! Exchange rate lookup.
//!
//! [`Client`] queries an exchangerate.host style `convert` endpoint:
//!
//! ```text
//! GET /convert?from=USD&to=EUR&amount=1&date=2021-05-18&access_key=...
//! {"success": true, "result": 0.818185}
//! ```
//!
//! Rates are cached per (from, to, day) in a [`RateCache`] for a bounded time.

pub mod cache;
pub mod client;
pub mod types;

use async_trait::async_trait;

pub use cache::{CacheKey, RateCache};
pub use client::{Client, Config};

use crate::Result;
use crate::types::{DateTime, Decimal, Utc};

/// Source of point-in-time exchange rates.
///
/// Implementations must be safe to call concurrently, and must report failures rather than fall
/// back to a default rate.
#[async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Rate to multiply an amount in `from` by to get the amount in `to`, as of `timestamp`.
    async fn rate(&self, from: &str, to: &str, timestamp: DateTime<Utc>) -> Result<Decimal>;
}

#[async_trait]
impl<P: RateProvider + ?Sized> RateProvider for std::sync::Arc<P> {
    async fn rate(&self, from: &str, to: &str, timestamp: DateTime<Utc>) -> Result<Decimal> {
        (**self).rate(from, to, timestamp).await
    }
}
