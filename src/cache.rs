use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

/// Explicit TTL cache for fetched-and-aggregated responses.
///
/// Keyed by endpoint name plus argument values; eviction is purely
/// time-based. Owned by the application state so repeated refreshes with
/// identical parameters skip the upstream round trip.
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    inserted_at: Instant,
    payload: serde_json::Value,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache key from an endpoint name and its argument values.
    pub fn key<I, S>(name: &str, args: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut key = String::from(name);
        for arg in args {
            key.push(':');
            key.push_str(arg.as_ref());
        }
        key
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                metrics::counter!("cache_hits_total").increment(1);
                serde_json::from_value(entry.payload.clone()).ok()
            }
            Some(_) => {
                entries.remove(key);
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
            None => {
                metrics::counter!("cache_misses_total").increment(1);
                None
            }
        }
    }

    pub async fn put<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(payload) = serde_json::to_value(value) {
            self.entries.lock().await.insert(
                key.to_string(),
                CacheEntry {
                    inserted_at: Instant::now(),
                    payload,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = QueryCache::new(Duration::from_secs(60));
        let key = QueryCache::key("summary", ["ATH", "2025-01-01"]);
        cache.put(&key, &vec![1u64, 2, 3]).await;

        let hit: Option<Vec<u64>> = cache.get(&key).await;
        assert_eq!(hit, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.put("k", &42u64).await;

        let miss: Option<u64> = cache.get("k").await;
        assert_eq!(miss, None);
        assert!(cache.entries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_distinct_args_distinct_keys() {
        assert_ne!(
            QueryCache::key("summary", ["ATH"]),
            QueryCache::key("summary", ["XRP"]),
        );
    }
}
