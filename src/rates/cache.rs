use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::types::{Decimal, NaiveDate};

/// Rates are cached per currency pair and calendar day.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
}

impl CacheKey {
    #[must_use]
    pub fn new(from: &str, to: &str, date: NaiveDate) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            date,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: Decimal,
    inserted_at: Instant,
}

/// Bounded, time-limited exchange rate cache. Safe to share between tasks.
///
/// Entries expire `ttl` after insertion. When full, expired entries are purged first and then the
/// oldest entry is evicted.
#[derive(Debug)]
pub struct RateCache {
    entries: DashMap<CacheKey, CachedRate>,
    ttl: Duration,
    capacity: usize,
}

impl RateCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Cached rate for `key`, if present and not expired.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Decimal> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key)
            && !self.is_expired(&entry, now)
        {
            return Some(entry.rate);
        }

        self.entries
            .remove_if(key, |_, entry| self.is_expired(entry, now));
        None
    }

    pub fn insert(&self, key: CacheKey, rate: Decimal) {
        let now = Instant::now();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.entries.retain(|_, entry| !self.is_expired(entry, now));

            if self.entries.len() >= self.capacity {
                let oldest = self
                    .entries
                    .iter()
                    .min_by_key(|entry| entry.value().inserted_at)
                    .map(|entry| entry.key().clone());

                if let Some(oldest) = oldest {
                    tracing::debug!(evicted = ?oldest, "Rate cache full, evicting oldest entry");
                    self.entries.remove(&oldest);
                }
            }
        }

        self.entries.insert(
            key,
            CachedRate {
                rate,
                inserted_at: now,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_expired(&self, entry: &CachedRate, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::advance;

    use super::*;
    use crate::types::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, d).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn hit_within_ttl() {
        let cache = RateCache::new(Duration::from_secs(600), 100);
        let key = CacheKey::new("USD", "EUR", day(18));

        cache.insert(key.clone(), dec!(0.82));
        advance(Duration::from_secs(599)).await;

        assert_eq!(cache.get(&key), Some(dec!(0.82)));
    }

    #[tokio::test(start_paused = true)]
    async fn miss_after_ttl_and_entry_is_dropped() {
        let cache = RateCache::new(Duration::from_secs(600), 100);
        let key = CacheKey::new("USD", "EUR", day(18));

        cache.insert(key.clone(), dec!(0.82));
        advance(Duration::from_secs(600)).await;

        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn keys_distinguish_pair_and_day() {
        let cache = RateCache::new(Duration::from_secs(600), 100);

        cache.insert(CacheKey::new("USD", "EUR", day(18)), dec!(0.82));

        assert_eq!(cache.get(&CacheKey::new("USD", "EUR", day(19))), None);
        assert_eq!(cache.get(&CacheKey::new("GBP", "EUR", day(18))), None);
        assert_eq!(
            cache.get(&CacheKey::new("USD", "EUR", day(18))),
            Some(dec!(0.82))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_purges_expired_before_evicting() {
        let cache = RateCache::new(Duration::from_secs(10), 2);

        cache.insert(CacheKey::new("USD", "EUR", day(1)), dec!(0.81));
        advance(Duration::from_secs(6)).await;
        cache.insert(CacheKey::new("USD", "EUR", day(2)), dec!(0.82));
        advance(Duration::from_secs(5)).await;

        // day 1 has expired, day 2 has not
        cache.insert(CacheKey::new("USD", "EUR", day(3)), dec!(0.83));

        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get(&CacheKey::new("USD", "EUR", day(2))),
            Some(dec!(0.82))
        );
        assert_eq!(
            cache.get(&CacheKey::new("USD", "EUR", day(3))),
            Some(dec!(0.83))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn full_cache_evicts_oldest() {
        let cache = RateCache::new(Duration::from_secs(600), 2);

        cache.insert(CacheKey::new("USD", "EUR", day(1)), dec!(0.81));
        advance(Duration::from_secs(1)).await;
        cache.insert(CacheKey::new("USD", "EUR", day(2)), dec!(0.82));
        advance(Duration::from_secs(1)).await;
        cache.insert(CacheKey::new("USD", "EUR", day(3)), dec!(0.83));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&CacheKey::new("USD", "EUR", day(1))), None);
    }

    #[tokio::test(start_paused = true)]
    async fn overwrite_does_not_evict() {
        let cache = RateCache::new(Duration::from_secs(600), 1);
        let key = CacheKey::new("USD", "EUR", day(18));

        cache.insert(key.clone(), dec!(0.81));
        cache.insert(key.clone(), dec!(0.82));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some(dec!(0.82)));
    }
}
