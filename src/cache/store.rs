use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::cache::entry::CacheEntry;
use crate::cache::fetcher::Fetcher;
use crate::cache::key::CacheKey;
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOptions {
    /// `None` fetches once on mount and then only on demand.
    pub refresh_interval: Option<Duration>,
}

impl PollOptions {
    pub fn every(interval: Duration) -> Self {
        Self {
            refresh_interval: Some(interval),
        }
    }

    pub fn once() -> Self {
        Self::default()
    }
}

/// Stale-while-revalidate cache keyed by request path.
///
/// Every key has at most one polling timer, shared by all of its subscribers and
/// running at the shortest interval any of them asked for. Fetches for a key
/// are coalesced while one is in flight, except for explicit [`mutate`] calls.
/// Each fetch carries a generation number so that a slow response can never
/// overwrite a newer one, and each mount of a key carries an epoch so that
/// responses issued before an unmount are dropped.
///
/// Must be used from within a Tokio runtime.
///
/// [`mutate`]: PollingCache::mutate
#[derive(Clone)]
pub struct PollingCache {
    shared: Arc<Shared>,
}

struct Shared {
    fetcher: Arc<dyn Fetcher>,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    slots: HashMap<CacheKey, Slot>,
    next_epoch: u64,
}

struct Slot {
    epoch: u64,
    tx: watch::Sender<CacheEntry>,
    subscribers: usize,
    intervals: Vec<Duration>,
    timer: Option<Timer>,
    issued: u64,
    applied: u64,
    in_flight: usize,
}

struct Timer {
    period: Duration,
    handle: JoinHandle<()>,
}

#[derive(Debug, Clone, Copy)]
struct Ticket {
    epoch: u64,
    generation: u64,
}

impl Slot {
    fn new(epoch: u64) -> Self {
        let (tx, _) = watch::channel(CacheEntry::default());
        Self {
            epoch,
            tx,
            subscribers: 0,
            intervals: Vec::new(),
            timer: None,
            issued: 0,
            applied: 0,
            in_flight: 0,
        }
    }

    fn effective_interval(&self) -> Option<Duration> {
        self.intervals.iter().min().copied()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserves a fetch, or returns `None` when it folds into one already in flight.
    fn begin_fetch(&self, key: &CacheKey, force: bool) -> Option<Ticket> {
        let mut state = self.lock();
        let slot = state.slots.get_mut(key)?;
        if !force && slot.in_flight > 0 {
            return None;
        }

        slot.issued += 1;
        slot.in_flight += 1;
        slot.tx.send_modify(|entry| entry.is_validating = true);

        Some(Ticket {
            epoch: slot.epoch,
            generation: slot.issued,
        })
    }

    fn finish_fetch(&self, key: &CacheKey, ticket: Ticket, result: Result<Value>) {
        let mut state = self.lock();
        let Some(slot) = state.slots.get_mut(key) else {
            tracing::debug!("Dropping response for unmounted key {}", key);
            return;
        };
        if slot.epoch != ticket.epoch {
            tracing::debug!("Dropping response for a previous mount of {}", key);
            return;
        }

        slot.in_flight = slot.in_flight.saturating_sub(1);
        let validating = slot.in_flight > 0;

        if ticket.generation <= slot.applied {
            tracing::debug!(
                "Dropping out-of-order response for {} (generation {} <= {})",
                key,
                ticket.generation,
                slot.applied
            );
            slot.tx.send_modify(|entry| entry.is_validating = validating);
            return;
        }
        slot.applied = ticket.generation;

        slot.tx.send_modify(|entry| {
            match result {
                Ok(value) => {
                    entry.data = Some(Arc::new(value));
                    entry.error = None;
                    entry.updated_at = Some(Utc::now());
                }
                Err(e) => {
                    if e.is_retryable() {
                        tracing::warn!("Refresh of {} failed, retrying next tick: {}", key, e);
                    } else {
                        tracing::error!("Refresh of {} failed: {}", key, e);
                    }
                    entry.error = Some(Arc::new(e));
                }
            }
            entry.is_validating = validating;
        });
    }
}

async fn revalidate(shared: Arc<Shared>, key: CacheKey, force: bool) {
    let Some(ticket) = shared.begin_fetch(&key, force) else {
        tracing::trace!("Coalesced refresh of {}", key);
        return;
    };

    tracing::debug!("Fetching {} via {}", key, shared.fetcher.name());
    let result = shared.fetcher.fetch(&key).await;
    shared.finish_fetch(&key, ticket, result);
}

fn spawn_timer(shared: &Arc<Shared>, key: CacheKey, period: Duration) -> JoinHandle<()> {
    let weak: Weak<Shared> = Arc::downgrade(shared);
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let Some(shared) = weak.upgrade() else {
                break;
            };
            // Fetches run on their own task so that aborting the timer never
            // strands an in-flight counter.
            tokio::spawn(revalidate(shared, key.clone(), false));
        }
    })
}

fn reschedule(shared: &Arc<Shared>, key: &CacheKey, slot: &mut Slot) {
    let wanted = slot.effective_interval();
    let current = slot.timer.as_ref().map(|t| t.period);
    if wanted == current {
        return;
    }

    if let Some(timer) = slot.timer.take() {
        timer.handle.abort();
    }
    if let Some(period) = wanted {
        tracing::debug!("Polling {} every {:?}", key, period);
        slot.timer = Some(Timer {
            period,
            handle: spawn_timer(shared, key.clone(), period),
        });
    }
}

impl PollingCache {
    pub fn new(fetcher: impl Fetcher + 'static) -> Self {
        Self::with_fetcher(Arc::new(fetcher))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Mounts a subscriber. A `None` key yields a subscription that never fetches
    /// and stays in the loading state.
    pub fn subscribe(&self, key: Option<CacheKey>, options: PollOptions) -> Subscription {
        let Some(key) = key else {
            return Subscription::disabled();
        };

        let rx = {
            let mut state = self.shared.lock();
            let CacheState { slots, next_epoch } = &mut *state;
            let slot = slots.entry(key.clone()).or_insert_with(|| {
                *next_epoch += 1;
                Slot::new(*next_epoch)
            });

            slot.subscribers += 1;
            if let Some(interval) = options.refresh_interval {
                slot.intervals.push(interval);
            }
            reschedule(&self.shared, &key, slot);
            slot.tx.subscribe()
        };

        tokio::spawn(revalidate(self.shared.clone(), key.clone(), false));

        Subscription {
            key: Some(key),
            interval: options.refresh_interval,
            rx,
            cache: Some(self.clone()),
            _idle: None,
        }
    }

    fn unsubscribe(&self, key: &CacheKey, interval: Option<Duration>) {
        let mut state = self.shared.lock();
        let Some(slot) = state.slots.get_mut(key) else {
            return;
        };

        slot.subscribers = slot.subscribers.saturating_sub(1);
        if let Some(interval) = interval {
            if let Some(pos) = slot.intervals.iter().position(|&i| i == interval) {
                slot.intervals.swap_remove(pos);
            }
        }

        if slot.subscribers == 0 {
            if let Some(timer) = slot.timer.take() {
                timer.handle.abort();
            }
            state.slots.remove(key);
            tracing::debug!("Evicted {}", key);
        } else {
            reschedule(&self.shared, key, slot);
        }
    }

    pub fn get(&self, key: &CacheKey) -> CacheEntry {
        self.shared
            .lock()
            .slots
            .get(key)
            .map(|slot| slot.tx.borrow().clone())
            .unwrap_or_default()
    }

    /// Forces a fetch for `key`, even while another one is in flight, and waits
    /// for it to land. Stale data stays visible meanwhile.
    pub async fn mutate(&self, key: &CacheKey) -> CacheEntry {
        let task = tokio::spawn(revalidate(self.shared.clone(), key.clone(), true));
        if let Err(e) = task.await {
            tracing::warn!("Refresh task for {} did not complete: {}", key, e);
        }
        self.get(key)
    }

    /// Drops the data and error for `key` and refetches it.
    pub fn invalidate(&self, key: &CacheKey) {
        let refetch = {
            let mut state = self.shared.lock();
            match state.slots.get_mut(key) {
                Some(slot) => {
                    // Anything already in flight belongs to the old data.
                    slot.applied = slot.issued;
                    slot.tx.send_replace(CacheEntry::default());
                    slot.subscribers > 0
                }
                None => false,
            }
        };

        if refetch {
            tokio::spawn(revalidate(self.shared.clone(), key.clone(), true));
        }
    }

    /// Invalidates every key locally and asks the source to clear its cache,
    /// without waiting for the remote side to answer.
    pub fn clear_cache(&self) {
        let fetcher = self.shared.fetcher.clone();
        tokio::spawn(async move {
            match fetcher.clear_remote().await {
                Ok(()) => tracing::info!("Remote cache cleared"),
                Err(e) => tracing::warn!("Failed to clear remote cache: {}", e),
            }
        });

        let keys = self.keys();
        tracing::info!("Invalidating {} cached keys", keys.len());
        for key in keys {
            self.invalidate(&key);
        }
    }

    pub fn keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<CacheKey> = self.shared.lock().slots.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn subscriber_count(&self, key: &CacheKey) -> usize {
        self.shared
            .lock()
            .slots
            .get(key)
            .map_or(0, |slot| slot.subscribers)
    }

    pub fn polling_interval(&self, key: &CacheKey) -> Option<Duration> {
        self.shared
            .lock()
            .slots
            .get(key)
            .and_then(|slot| slot.timer.as_ref().map(|t| t.period))
    }
}

/// A mounted consumer of one cache key. Dropping it unmounts.
pub struct Subscription {
    key: Option<CacheKey>,
    interval: Option<Duration>,
    rx: watch::Receiver<CacheEntry>,
    cache: Option<PollingCache>,
    // Keeps a disabled subscription's channel open so `changed` just pends.
    _idle: Option<watch::Sender<CacheEntry>>,
}

impl Subscription {
    fn disabled() -> Self {
        let (tx, rx) = watch::channel(CacheEntry::default());
        Self {
            key: None,
            interval: None,
            rx,
            cache: None,
            _idle: Some(tx),
        }
    }

    pub fn key(&self) -> Option<&CacheKey> {
        self.key.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    pub fn current(&self) -> CacheEntry {
        self.rx.borrow().clone()
    }

    /// Resolves on the next update of this key.
    pub async fn changed(&mut self) {
        if self.rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    pub async fn wait_until(&mut self, predicate: impl Fn(&CacheEntry) -> bool) -> CacheEntry {
        loop {
            {
                let entry = self.rx.borrow_and_update();
                if predicate(&*entry) {
                    return CacheEntry::clone(&entry);
                }
            }
            self.changed().await;
        }
    }

    pub async fn mutate(&self) {
        if let (Some(cache), Some(key)) = (&self.cache, &self.key) {
            cache.mutate(key).await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let (Some(cache), Some(key)) = (self.cache.take(), self.key.take()) {
            cache.unsubscribe(&key, self.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::ScriptedFetcher;
    use crate::error::Error;
    use serde_json::json;
    use tokio::time::sleep;

    fn key() -> CacheKey {
        CacheKey::from("/api/github?type=repositories")
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_fetches_once() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"data": [1]}))]);
        let calls = fetcher.calls();
        let cache = PollingCache::new(fetcher);

        let mut sub = cache.subscribe(Some(key()), PollOptions::once());
        let entry = sub.wait_until(|e| e.data.is_some()).await;

        assert_eq!(entry.data.as_deref(), Some(&json!({"data": [1]})));
        assert!(entry.updated_at.is_some());
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.polling_interval(&key()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_share_one_timer() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"data": 1}))])
            .with_delay(Duration::from_millis(100));
        let calls = fetcher.calls();
        let cache = PollingCache::new(fetcher);

        let _a = cache.subscribe(Some(key()), PollOptions::every(Duration::from_secs(10)));
        let _b = cache.subscribe(Some(key()), PollOptions::every(Duration::from_secs(10)));
        assert_eq!(cache.subscriber_count(&key()), 2);

        sleep(Duration::from_millis(10_150)).await;
        // One mount fetch (the second coalesced) plus one tick.
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shortest_interval_wins() {
        let cache = PollingCache::new(ScriptedFetcher::new(vec![Ok(json!({"data": 1}))]));

        let _slow = cache.subscribe(Some(key()), PollOptions::every(Duration::from_secs(60)));
        let fast = cache.subscribe(Some(key()), PollOptions::every(Duration::from_secs(5)));
        assert_eq!(cache.polling_interval(&key()), Some(Duration::from_secs(5)));

        drop(fast);
        assert_eq!(cache.polling_interval(&key()), Some(Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_stale_data() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(json!({"data": "good"})),
            Err(Error::Api {
                status: 502,
                message: "bad gateway".to_string(),
            }),
            Ok(json!({"data": "fresh"})),
        ]);
        let cache = PollingCache::new(fetcher);
        let mut sub = cache.subscribe(Some(key()), PollOptions::every(Duration::from_secs(1)));

        sub.wait_until(|e| e.data.is_some()).await;
        let stale = sub.wait_until(|e| e.error.is_some()).await;
        assert!(stale.is_stale());
        assert_eq!(stale.data.as_deref(), Some(&json!({"data": "good"})));

        let recovered = sub.wait_until(|e| e.error.is_none() && !e.is_validating).await;
        assert_eq!(recovered.data.as_deref(), Some(&json!({"data": "fresh"})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_is_kept_without_data() {
        let cache = PollingCache::new(ScriptedFetcher::new(Vec::new()));
        let mut sub = cache.subscribe(Some(key()), PollOptions::once());

        let entry = sub.wait_until(|e| e.is_settled()).await;
        assert!(entry.data.is_none());
        let error = entry.error.expect("error recorded");
        assert!(!error.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_stops_polling_and_evicts() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"data": 1}))]);
        let calls = fetcher.calls();
        let cache = PollingCache::new(fetcher);

        let mut sub = cache.subscribe(Some(key()), PollOptions::every(Duration::from_secs(1)));
        sub.wait_until(|e| e.data.is_some()).await;
        drop(sub);

        let before = calls.get();
        sleep(Duration::from_secs(5)).await;
        assert_eq!(calls.get(), before);
        assert!(cache.get(&key()).is_loading());
        assert!(cache.keys().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_response_is_dropped() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"data": 1})), Ok(json!({"data": 2}))])
            .with_delays(vec![Duration::from_millis(500), Duration::from_millis(10)]);
        let cache = PollingCache::new(fetcher);

        let sub = cache.subscribe(Some(key()), PollOptions::once());
        let entry = cache.mutate(&key()).await;
        assert_eq!(entry.data.as_deref(), Some(&json!({"data": 2})));

        sleep(Duration::from_secs(1)).await;
        let entry = sub.current();
        assert_eq!(entry.data.as_deref(), Some(&json!({"data": 2})));
        assert!(!entry.is_validating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_key_never_fetches() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"data": 1}))]);
        let calls = fetcher.calls();
        let cache = PollingCache::new(fetcher);

        let sub = cache.subscribe(None, PollOptions::every(Duration::from_secs(1)));
        sleep(Duration::from_secs(3)).await;

        assert!(!sub.is_enabled());
        assert!(sub.current().is_loading());
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_refetches() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"data": "a"})), Ok(json!({"data": "b"}))]);
        let calls = fetcher.calls();
        let cache = PollingCache::new(fetcher);

        let mut sub = cache.subscribe(Some(key()), PollOptions::once());
        sub.wait_until(|e| e.data.is_some()).await;

        cache.invalidate(&key());
        assert!(cache.get(&key()).data.is_none());

        let entry = sub.wait_until(|e| e.data.is_some()).await;
        assert_eq!(entry.data.as_deref(), Some(&json!({"data": "b"})));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cache_reaches_remote() {
        let fetcher = ScriptedFetcher::new(vec![Ok(json!({"data": 1}))]);
        let clears = fetcher.clears();
        let cache = PollingCache::new(fetcher);

        let mut sub = cache.subscribe(Some(key()), PollOptions::once());
        sub.wait_until(|e| e.data.is_some()).await;

        cache.clear_cache();
        sleep(Duration::from_millis(1)).await;
        assert_eq!(clears.get(), 1);

        let entry = sub.wait_until(|e| e.data.is_some()).await;
        assert!(entry.error.is_none());
    }
}
