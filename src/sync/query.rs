//! Polled queries: a background task keeps one value fresh and publishes it through a
//! `watch` channel.

use crate::service::ServiceError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};

/// Cache key for invalidation after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    Orders,
    StockStatus,
    CallerRole,
    CallerProfile,
}

/// Snapshot of a query as seen by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    /// Last successfully fetched value. Kept when a later fetch fails.
    pub data: Option<T>,
    /// Error of the most recent fetch, cleared by the next success.
    pub error: Option<ServiceError>,
    pub is_fetching: bool,
    /// Number of fetches that have finished, successful or not.
    pub fetch_count: u64,
}

impl<T> QueryState<T> {
    /// Nothing to show yet: the first fetch has not come back.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.error.is_none()
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_fetching: false,
            fetch_count: 0,
        }
    }
}

/// Something a [`PolledQuery`] can fetch.
#[async_trait]
pub trait QuerySource: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    async fn fetch(&self) -> Result<Self::Output, ServiceError>;
}

/// Handle to a running query. Dropping it stops the background task.
///
/// A single task performs every fetch for the query, one at a time, so a response can
/// never be overtaken by an older one.
pub struct PolledQuery<T> {
    state: watch::Receiver<QueryState<T>>,
    trigger: Arc<Notify>,
    task: JoinHandle<()>,
}

impl<T: Clone + Send + Sync + 'static> PolledQuery<T> {
    /// Fetches immediately, then again after `every` (if set), on [`refetch`](Self::refetch),
    /// and whenever `scope` is broadcast on `invalidations`.
    pub fn spawn<S>(
        source: S,
        scope: QueryScope,
        every: Option<Duration>,
        invalidations: broadcast::Receiver<QueryScope>,
    ) -> Self
    where
        S: QuerySource<Output = T>,
    {
        let (tx, state) = watch::channel(QueryState::default());
        let trigger = Arc::new(Notify::new());
        let ticker = every.map(|period| {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        let task = tokio::spawn(poll_loop(source, scope, tx, trigger.clone(), ticker, invalidations));

        Self { state, trigger, task }
    }

    /// Current snapshot.
    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    /// Receiver that is notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.clone()
    }

    /// Asks for a fetch as soon as the current one (if any) finishes.
    pub fn refetch(&self) {
        self.trigger.notify_one();
    }
}

impl<T> Drop for PolledQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop<S: QuerySource>(
    source: S,
    scope: QueryScope,
    tx: watch::Sender<QueryState<S::Output>>,
    trigger: Arc<Notify>,
    mut ticker: Option<Interval>,
    mut invalidations: broadcast::Receiver<QueryScope>,
) {
    let mut listening = true;
    loop {
        tx.send_modify(|state| state.is_fetching = true);
        let result = source.fetch().await;
        tx.send_modify(|state| {
            state.is_fetching = false;
            state.fetch_count += 1;
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(e) => {
                    warn!(?scope, error = %e, "Query fetch failed");
                    state.error = Some(e);
                }
            }
        });
        if let Some(ticker) = ticker.as_mut() {
            ticker.reset();
        }

        // wait for the next reason to fetch
        loop {
            tokio::select! {
                _ = tick(&mut ticker) => break,
                _ = trigger.notified() => break,
                received = invalidations.recv(), if listening => match received {
                    Ok(invalidated) if invalidated == scope => {
                        debug!(?scope, "Invalidated");
                        break;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(?scope, skipped, "Invalidations lagged, refetching");
                        break;
                    }
                    Err(broadcast::error::RecvError::Closed) => listening = false,
                },
            }
        }
    }
}

async fn tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Counter {
        calls: Arc<AtomicU32>,
        fail: bool,
    }

    #[async_trait]
    impl QuerySource for Counter {
        type Output = u32;

        async fn fetch(&self) -> Result<u32, ServiceError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                Err(ServiceError::Unavailable("down".into()))
            } else {
                Ok(n)
            }
        }
    }

    fn counter(fail: bool) -> (Counter, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        (Counter { calls: calls.clone(), fail }, calls)
    }

    #[tokio::test]
    async fn test_fetches_on_start_and_on_refetch() {
        let (_tx, rx) = broadcast::channel(8);
        let (source, _) = counter(false);
        let query = PolledQuery::spawn(source, QueryScope::Orders, None, rx);
        let mut state = query.subscribe();

        state.wait_for(|s| s.fetch_count == 1).await.unwrap();
        assert_eq!(query.data(), Some(1));

        query.refetch();
        state.wait_for(|s| s.fetch_count == 2).await.unwrap();
        assert_eq!(query.data(), Some(2));
    }

    #[tokio::test]
    async fn test_only_matching_scope_invalidates() {
        let (tx, rx) = broadcast::channel(8);
        let (source, calls) = counter(false);
        let query = PolledQuery::spawn(source, QueryScope::Orders, None, rx);
        let mut state = query.subscribe();
        state.wait_for(|s| s.fetch_count == 1).await.unwrap();

        tx.send(QueryScope::StockStatus).unwrap();
        tx.send(QueryScope::Orders).unwrap();
        state.wait_for(|s| s.fetch_count == 2).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_polls_on_interval() {
        let (_tx, rx) = broadcast::channel(8);
        let (source, _) = counter(false);
        let query = PolledQuery::spawn(source, QueryScope::StockStatus, Some(Duration::from_millis(20)), rx);
        let mut state = query.subscribe();

        tokio::time::timeout(Duration::from_secs(2), state.wait_for(|s| s.fetch_count >= 3))
            .await
            .expect("query stopped polling")
            .unwrap();
    }

    #[tokio::test]
    async fn test_drop_stops_polling() {
        let (_tx, rx) = broadcast::channel(8);
        let (source, calls) = counter(false);
        let query = PolledQuery::spawn(source, QueryScope::StockStatus, Some(Duration::from_millis(10)), rx);
        let mut state = query.subscribe();
        state.wait_for(|s| s.fetch_count == 1).await.unwrap();
        drop(query);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_drop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_loading() {
        let (_tx, rx) = broadcast::channel(8);
        let (source, _) = counter(true);
        let query = PolledQuery::spawn(source, QueryScope::Orders, None, rx);
        let mut state = query.subscribe();
        let settled = state.wait_for(|s| s.fetch_count == 1).await.unwrap().clone();
        assert!(!settled.is_loading());
        assert!(settled.data.is_none());
        assert_eq!(settled.error, Some(ServiceError::Unavailable("down".into())));
    }
}
