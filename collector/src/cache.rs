use std::{
    future::Future,
    sync::Arc,
    time::Duration,
};
use tokio::{
    sync::Mutex,
    time::Instant,
};

struct CacheEntry<T> {
    value: Arc<T>,
    fetched_at: Instant,
    generation: u64,
}

/// A single cached dataset with a time-to-live.
///
/// The slot lock is held while a refresh runs, so concurrent callers that find the entry expired wait for the one
/// in-flight refresh instead of starting their own. The refresh runs on its own task which owns the lock: a caller
/// that gives up waiting does not cancel it, and the next caller finds the stored result.
pub struct TtlSlot<T> {
    name: &'static str,
    ttl: Duration,
    entry: Arc<Mutex<Option<CacheEntry<T>>>>,
}

impl<T> TtlSlot<T>
where
    T: Default + Send + Sync + 'static,
{
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entry: Arc::new(Mutex::new(None)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Return the cached value if it is younger than the TTL, otherwise run `refresh` and store its result.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Arc<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut entry = self.entry.clone().lock_owned().await;
        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                trace!(slot = self.name, generation = cached.generation, "cache hit");
                return cached.value.clone();
            }
        }

        let name = self.name;
        let stale = entry.as_ref().map(|cached| cached.value.clone());
        let fetch = refresh();
        let task = tokio::spawn(async move {
            let generation = entry.as_ref().map_or(1, |cached| cached.generation + 1);
            let started = Instant::now();
            let value = Arc::new(fetch.await);
            debug!(slot = name, generation, elapsed = ?started.elapsed(), "cache refreshed");

            *entry = Some(CacheEntry {
                value: value.clone(),
                fetched_at: Instant::now(),
                generation,
            });
            value
        });

        match task.await {
            Ok(value) => value,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => {
                error!(slot = name, error = %err, "cache refresh did not complete");
                stale.unwrap_or_default()
            }
        }
    }

    /// Number of refreshes so far. Zero until the first access.
    pub async fn generation(&self) -> u64 {
        self.entry
            .lock()
            .await
            .as_ref()
            .map_or(0, |cached| cached.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    #[tokio::test(start_paused = true)]
    async fn hit_within_ttl_and_refresh_after() {
        let slot = TtlSlot::new("test", Duration::from_secs(60));
        let fetches = Arc::new(AtomicUsize::new(0));
        let fetch = || {
            let fetches = fetches.clone();
            async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                vec![1, 2, 3]
            }
        };

        assert_eq!(*slot.get_or_refresh(fetch).await, vec![1, 2, 3]);
        tokio::time::advance(Duration::from_secs(59)).await;
        slot.get_or_refresh(fetch).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(slot.generation().await, 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        slot.get_or_refresh(fetch).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(slot.generation().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_share_one_refresh() {
        let slot = Arc::new(TtlSlot::new("test", Duration::from_secs(60)));
        let fetches = Arc::new(AtomicUsize::new(0));

        let tasks = (0..8)
            .map(|_| {
                let slot = slot.clone();
                let fetches = fetches.clone();
                tokio::spawn(async move {
                    slot.get_or_refresh(move || async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        "directory"
                    })
                    .await
                })
            })
            .collect::<Vec<_>>();

        for task in tasks {
            assert_eq!(*task.await.unwrap(), "directory");
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_refresh_still_fills_the_slot() {
        let slot = TtlSlot::new("test", Duration::from_secs(60));
        let fetches = Arc::new(AtomicUsize::new(0));
        let fetch = || {
            let fetches = fetches.clone();
            async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5)).await;
                7u32
            }
        };

        let gave_up = tokio::time::timeout(Duration::from_secs(1), slot.get_or_refresh(fetch)).await;
        assert!(gave_up.is_err());

        assert_eq!(*slot.get_or_refresh(fetch).await, 7);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(slot.generation().await, 1);
    }

    #[tokio::test]
    async fn zero_ttl_always_refreshes() {
        let slot = TtlSlot::new("test", Duration::ZERO);
        let first = slot.get_or_refresh(|| async { 1u32 }).await;
        let second = slot.get_or_refresh(|| async { 2u32 }).await;
        assert_eq!((*first, *second), (1, 2));
        assert_eq!(slot.generation().await, 2);
    }
}
