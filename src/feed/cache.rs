//! Bounded in-memory cache fronting every upstream feed fetch.

use crate::feed::error::FeedError;
use bytes::Bytes;
use log::{info, warn};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct CacheEntry {
    payload: Bytes,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.inserted_at) <= self.ttl
    }
}

/// TTL- and capacity-bounded byte store with single-flight fetches.
///
/// `get_or_fetch` takes the upstream fetch as an async closure, so the cache
/// stays transport-agnostic. At most one fetch is in flight per key:
/// concurrent callers for the same key wait on that flight and then read the
/// stored payload instead of fetching again. The flight itself runs on a
/// detached task, so a caller that stops waiting does not cancel the fetch
/// other waiters depend on. When capacity is exceeded, the entry with the
/// oldest insertion time is evicted (ties broken by key).
pub struct FeedCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    capacity: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
    flights: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FeedCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                capacity,
                entries: Mutex::new(HashMap::new()),
                flights: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Returns the payload stored under `key` if it is younger than `ttl`,
    /// otherwise runs `fetch`, stores its payload with the current timestamp,
    /// and returns it.
    ///
    /// A failed fetch is handed back to the caller that started it and
    /// nothing is stored; the cache never retries on its own. Waiters queued
    /// behind a failed flight find no fresh entry and run their own fetch,
    /// one at a time.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<Bytes, FeedError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, FeedError>> + Send + 'static,
    {
        if let Some(payload) = self.inner.lookup(key).await {
            info!("cache hit for feed key {key}");
            return Ok(payload);
        }

        let flight = self.inner.flight_lock(key).await;
        let guard = flight.lock_owned().await;

        // A flight that finished while this caller waited on the key lock may
        // have populated the entry; check again before fetching.
        if let Some(payload) = self.inner.lookup(key).await {
            info!("cache hit for feed key {key} after in-flight fetch");
            return Ok(payload);
        }

        warn!("cache miss for feed key {key}, fetching upstream");
        let future = fetch();
        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        let handle = tokio::spawn(async move {
            // The flight guard lives exactly as long as fetch-and-populate.
            let _guard = guard;
            let payload = future.await?;
            inner.insert(&key, payload.clone(), ttl).await;
            Ok(payload)
        });
        handle.await?
    }

    /// Drops every entry immediately. Idempotent.
    pub async fn clear(&self) {
        self.inner.entries.lock().await.clear();
    }
}

impl CacheInner {
    async fn lookup(&self, key: &str) -> Option<Bytes> {
        let entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        entry.is_fresh(Instant::now()).then(|| entry.payload.clone())
    }

    async fn insert(&self, key: &str, payload: Bytes, ttl: Duration) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                payload,
                inserted_at: Instant::now(),
                ttl,
            },
        );
        while entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by(|(key_a, entry_a), (key_b, entry_b)| {
                    entry_a
                        .inserted_at
                        .cmp(&entry_b.inserted_at)
                        .then_with(|| key_a.cmp(key_b))
                })
                .map(|(key, _)| key.clone());
            match oldest {
                Some(victim) => {
                    warn!("feed cache over capacity, evicting key {victim}");
                    entries.remove(&victim);
                }
                None => break,
            }
        }
    }

    async fn flight_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut flights = self.flights.lock().await;
        flights
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
