use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use storage::models::{CombinedEvent, Competition};
use tokio::sync::{Notify, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::scorecard::SharedApi;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

#[async_trait]
pub trait Refresh: Send + Sync + 'static {
    async fn refresh(&self) -> Result<()>;
}

/// Re-fetches on a fixed interval, and immediately whenever the view regains
/// focus or becomes visible again.
pub struct RefreshPoller {
    trigger: Arc<Notify>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl RefreshPoller {
    /// Starts polling; the first refresh runs right away.
    pub fn spawn<R: Refresh>(refresher: Arc<R>, interval: Duration) -> Self {
        let trigger = Arc::new(Notify::new());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(poll(refresher, interval, trigger.clone(), shutdown_rx));

        Self {
            trigger,
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    pub fn notify_focus(&self) {
        debug!("Focus regained, refreshing");
        self.trigger.notify_one();
    }

    pub fn notify_visible(&self) {
        debug!("View visible again, refreshing");
        self.trigger.notify_one();
    }

    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!("Refresh task ended abnormally: {}", e);
        }
    }
}

impl Drop for RefreshPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll<R: Refresh>(
    refresher: Arc<R>,
    interval: Duration,
    trigger: Arc<Notify>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
            _ = trigger.notified() => ticker.reset(),
        }

        if let Err(e) = refresher.refresh().await {
            warn!(error = %e, "Refresh failed; keeping previous data");
        }
    }

    debug!("Refresh poller stopped");
}

/// Collections a results screen must never show stale for long.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub competitions: Vec<Competition>,
    pub combined_events: Vec<CombinedEvent>,
}

/// Keeps the competition list and one competition's combined events fresh.
pub struct CriticalCollections {
    api: SharedApi,
    competition_id: Uuid,
    snapshot: watch::Sender<Snapshot>,
}

impl CriticalCollections {
    pub fn new(api: SharedApi, competition_id: Uuid) -> Self {
        let (snapshot, _) = watch::channel(Snapshot::default());
        Self {
            api,
            competition_id,
            snapshot,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub fn current(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }
}

#[async_trait]
impl Refresh for CriticalCollections {
    async fn refresh(&self) -> Result<()> {
        let competitions = self.api.list_competitions().await?;
        let combined_events = self.api.list_combined_events(self.competition_id).await?;

        debug!(
            competitions = competitions.len(),
            combined_events = combined_events.len(),
            "Refreshed critical collections"
        );
        self.snapshot.send_replace(Snapshot {
            competitions,
            combined_events,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::fake::FakeApi;
    use storage::models::{EventType, Gender};

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Refresh for Counter {
        async fn refresh(&self) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_on_interval() {
        let counter = Arc::new(Counter::default());
        let poller = RefreshPoller::spawn(counter.clone(), DEFAULT_INTERVAL);

        settle().await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(DEFAULT_INTERVAL).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);

        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_focus_and_visibility_refresh_immediately() {
        let counter = Arc::new(Counter::default());
        let poller = RefreshPoller::spawn(counter.clone(), DEFAULT_INTERVAL);
        settle().await;

        poller.notify_focus();
        settle().await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 2);

        poller.notify_visible();
        settle().await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 3);

        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_polling() {
        let counter = Arc::new(Counter::default());
        let poller = RefreshPoller::spawn(counter.clone(), DEFAULT_INTERVAL);
        settle().await;

        poller.shutdown().await;
        tokio::time::sleep(DEFAULT_INTERVAL * 4).await;

        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_critical_collections_snapshot() {
        let fake = Arc::new(FakeApi::default());
        fake.seed_event(EventType::Decathlon, Gender::Male);
        fake.seed_event(EventType::Heptathlon, Gender::Female);
        let collections = CriticalCollections::new(fake.clone(), Uuid::nil());
        let mut updates = collections.subscribe();

        collections.refresh().await.unwrap();

        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().combined_events.len(), 2);
        assert_eq!(fake.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let fake = Arc::new(FakeApi::default());
        fake.seed_event(EventType::Decathlon, Gender::Male);
        let collections = CriticalCollections::new(fake.clone(), Uuid::nil());
        collections.refresh().await.unwrap();

        fake.set_offline(true);
        assert!(collections.refresh().await.is_err());

        assert_eq!(collections.current().combined_events.len(), 1);
    }
}
