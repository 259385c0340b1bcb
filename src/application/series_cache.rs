// Session cache - at most one fetch per series for the session
use crate::application::series_provider::{FetchError, SeriesProvider};
use crate::domain::series::{Series, SeriesId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

/// Per-series slot: either a fetch is outstanding and callers share its
/// result channel, or the result is cached for the rest of the session.
enum Slot {
    InFlight(broadcast::Sender<Result<Series, FetchError>>),
    Cached(Series),
}

pub struct SeriesCache {
    provider: Arc<dyn SeriesProvider>,
    slots: Arc<Mutex<HashMap<SeriesId, Slot>>>,
}

impl SeriesCache {
    pub fn new(provider: Arc<dyn SeriesProvider>) -> Self {
        Self {
            provider,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the series, fetching it at most once. Concurrent callers for
    /// the same uncached series share a single in-flight fetch and all see
    /// the same result. A failure is not cached; the next request fetches
    /// again. Fetches for different series proceed independently.
    pub async fn get(&self, id: SeriesId) -> Result<Series, FetchError> {
        let mut rx = {
            let mut slots = self.slots.lock().await;
            match slots.get(&id) {
                Some(Slot::Cached(series)) => {
                    tracing::debug!("serving {} series from cache", id);
                    return Ok(series.clone());
                }
                Some(Slot::InFlight(tx)) => tx.subscribe(),
                None => {
                    let (tx, rx) = broadcast::channel(1);
                    slots.insert(id, Slot::InFlight(tx.clone()));
                    self.spawn_fetch(id, tx);
                    rx
                }
            }
        };

        match rx.recv().await {
            Ok(result) => result,
            // The fetch task reports before dropping its sender; a closed
            // channel here means the runtime is tearing down.
            Err(_) => Err(FetchError::Transport(format!("{id} fetch interrupted"))),
        }
    }

    /// Run the fetch in its own task so it completes and settles the slot
    /// even when every waiter has gone away.
    fn spawn_fetch(&self, id: SeriesId, tx: broadcast::Sender<Result<Series, FetchError>>) {
        let provider = self.provider.clone();
        let slots = self.slots.clone();
        tokio::spawn(async move {
            tracing::debug!("fetching {} series", id);
            let result = provider.fetch(id).await;
            let mut slots = slots.lock().await;
            match &result {
                Ok(series) => {
                    slots.insert(id, Slot::Cached(series.clone()));
                }
                Err(err) => {
                    tracing::debug!("{} fetch failed, slot cleared for retry: {}", id, err);
                    slots.remove(&id);
                }
            }
            // Sent while the lock is held, so late callers either observe
            // the settled slot or were already subscribed.
            let _ = tx.send(result);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubProvider {
        calls: AtomicUsize,
        delay: Duration,
        failures_left: AtomicUsize,
    }

    impl StubProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
                failures_left: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn failing_once(self) -> Self {
            self.failures_left.store(1, Ordering::SeqCst);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SeriesProvider for StubProvider {
        async fn fetch(&self, id: SeriesId) -> Result<Series, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(FetchError::Transport("connection refused".to_string()));
            }
            Ok(sample_series(id))
        }
    }

    fn sample_series(id: SeriesId) -> Series {
        match id {
            SeriesId::Stock => Series::new(
                vec!["t1".into(), "t2".into(), "t3".into()],
                vec![100.0, 110.0, 90.0],
            ),
            SeriesId::Population => Series::new(
                vec!["1950".into(), "1951".into()],
                vec![1_000_000.0, 2_000_000.0],
            ),
        }
    }

    #[tokio::test]
    async fn second_get_is_served_from_cache() {
        let provider = Arc::new(StubProvider::new());
        let cache = SeriesCache::new(provider.clone());

        let first = cache.get(SeriesId::Stock).await.unwrap();
        let second = cache.get(SeriesId::Stock).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_gets_share_one_fetch() {
        let provider = Arc::new(StubProvider::new().with_delay(Duration::from_millis(50)));
        let cache = SeriesCache::new(provider.clone());

        let (a, b) = tokio::join!(cache.get(SeriesId::Stock), cache.get(SeriesId::Stock));

        assert_eq!(a.unwrap(), sample_series(SeriesId::Stock));
        assert_eq!(b.unwrap(), sample_series(SeriesId::Stock));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_see_the_same_failure() {
        let provider = Arc::new(
            StubProvider::new()
                .with_delay(Duration::from_millis(50))
                .failing_once(),
        );
        let cache = SeriesCache::new(provider.clone());

        let (a, b) = tokio::join!(cache.get(SeriesId::Stock), cache.get(SeriesId::Stock));

        assert!(a.is_err());
        assert_eq!(a.unwrap_err(), b.unwrap_err());
        assert_eq!(provider.calls(), 1, "one shared fetch for both callers");
    }

    #[tokio::test]
    async fn failed_fetch_is_retried_on_next_request() {
        let provider = Arc::new(StubProvider::new().failing_once());
        let cache = SeriesCache::new(provider.clone());

        assert!(cache.get(SeriesId::Population).await.is_err());
        let recovered = cache.get(SeriesId::Population).await.unwrap();

        assert_eq!(recovered, sample_series(SeriesId::Population));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn series_are_cached_independently() {
        let provider = Arc::new(StubProvider::new());
        let cache = SeriesCache::new(provider.clone());

        cache.get(SeriesId::Stock).await.unwrap();
        cache.get(SeriesId::Population).await.unwrap();
        cache.get(SeriesId::Stock).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }
}
