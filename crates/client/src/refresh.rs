//! Periodic re-synchronisation of client views.
//!
//! Views are refreshed by refetching and replacing, never by patching, so a
//! tick can be skipped or repeated safely. [`LatestOnly`] makes sure a slow
//! fetch that has been superseded cannot overwrite a newer result, and
//! [`Poller`] drives a refresh on a fixed interval until it is stopped.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use studysync_core::{errors::StudyResult, models::chat::ChatMessage};
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, warn};

use crate::{
    planner::{SessionBoard, SessionPlanner},
    repositories::MessageFeed,
};

/// Identifies one fetch; only the most recently issued ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Holds the newest committed value and publishes it to subscribers.
pub struct LatestOnly<T> {
    issued: AtomicU64,
    tx: watch::Sender<Option<T>>,
}

impl<T> LatestOnly<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            issued: AtomicU64::new(0),
            tx,
        }
    }

    /// Starts a fetch, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Stores `value` if `ticket` is still the latest; returns whether it was kept.
    pub fn commit(&self, ticket: Ticket, value: T) -> bool {
        let kept = self.tx.send_if_modified(|slot| {
            if self.is_current(ticket) {
                *slot = Some(value);
                true
            } else {
                false
            }
        });

        if !kept {
            debug!("Discarding result of superseded fetch {:?}", ticket);
        }
        kept
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> Option<T>
    where
        T: Clone,
    {
        self.tx.borrow().clone()
    }
}

impl<T> Default for LatestOnly<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a refresh task immediately and then once per period.
///
/// Dropping the poller (or calling [`Poller::stop`]) ends the loop, so a
/// torn-down view never keeps fetching in the background.
pub struct Poller {
    name: &'static str,
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Poller {
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = StudyResult<()>> + Send + 'static,
    {
        // `interval` panics on a zero period.
        let period = period.max(Duration::from_millis(1));
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(target: "poller", "{} started ({:?} interval)", name, period);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if let Err(e) = task().await {
                            warn!(target: "poller", "{} refresh failed: {}", name, e);
                        }
                    }
                }
            }

            debug!(target: "poller", "{} stopped", name);
        });

        Self {
            name,
            stop: Some(stop_tx),
            handle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signals the loop to end and waits for the in-flight tick, if any.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if self.stop.is_some() {
            self.handle.abort();
        }
    }
}

/// The board of one group, kept fresh by refetching.
pub struct BoardView {
    planner: Arc<SessionPlanner>,
    latest: LatestOnly<SessionBoard>,
}

impl BoardView {
    pub fn new(planner: Arc<SessionPlanner>) -> Self {
        Self {
            planner,
            latest: LatestOnly::new(),
        }
    }

    /// Reloads the board; a reload overtaken by a newer one is dropped.
    pub async fn refresh(&self) -> StudyResult<bool> {
        let ticket = self.latest.begin();
        debug!("Refreshing board for group {}", self.planner.group_id());
        let board = self.planner.load(Utc::now()).await?;
        Ok(self.latest.commit(ticket, board))
    }

    pub fn current(&self) -> Option<SessionBoard> {
        self.latest.latest()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionBoard>> {
        self.latest.subscribe()
    }
}

/// Recent chat messages of one group.
pub struct ChatView {
    feed: Arc<dyn MessageFeed>,
    group_id: String,
    limit: usize,
    latest: LatestOnly<Vec<ChatMessage>>,
}

impl ChatView {
    pub fn new(feed: Arc<dyn MessageFeed>, group_id: impl Into<String>, limit: usize) -> Self {
        Self {
            feed,
            group_id: group_id.into(),
            limit,
            latest: LatestOnly::new(),
        }
    }

    pub async fn refresh(&self) -> StudyResult<bool> {
        let ticket = self.latest.begin();
        let messages = self.feed.list_messages(&self.group_id, self.limit).await?;
        Ok(self.latest.commit(ticket, messages))
    }

    pub fn current(&self) -> Vec<ChatMessage> {
        self.latest.latest().unwrap_or_default()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Vec<ChatMessage>>> {
        self.latest.subscribe()
    }

    /// Polls the feed every `period` until the returned poller is stopped or dropped.
    pub fn follow(self: &Arc<Self>, period: Duration) -> Poller {
        let view = Arc::clone(self);
        Poller::spawn("chat", period, move || {
            let view = Arc::clone(&view);
            async move { view.refresh().await.map(|_| ()) }
        })
    }
}
