//! Subscription lifecycle monitoring.
//!
//! A subscription is assessed against wall-clock time on every tick; the
//! derived status is broadcast to watchers and persisted whenever it changes.
//! Expiry is terminal for a given record: the ticker stops and a new
//! activation must restart it.

use chrono::{DateTime, TimeDelta, Utc};
use log::warn;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::config;
use crate::error::Result;
use crate::models::subscription::{Remaining, SubscriptionRecord, SubscriptionStatus};
use crate::store::{DocumentStore, UserPatch};

/// Classify a subscription at `now`.
///
/// Zero or negative time remaining means expired; the countdown is only
/// produced for active subscriptions.
pub fn assess(
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> (SubscriptionStatus, Option<Remaining>) {
    let diff = expires_at - now;
    if diff <= TimeDelta::zero() {
        (SubscriptionStatus::Expired, None)
    } else {
        (SubscriptionStatus::Active, Some(Remaining::decompose(diff)))
    }
}

/// Loads and reconciles the persisted subscription record for one account.
pub struct SubscriptionService<'a, S: DocumentStore> {
    store: &'a S,
    account: &'a str,
}

impl<'a, S: DocumentStore> SubscriptionService<'a, S> {
    pub fn new(store: &'a S, account: &'a str) -> Self {
        Self { store, account }
    }

    /// The account's subscription record, reconciled with wall-clock time.
    ///
    /// An account with no subscription fields gets the expired sentinel
    /// written back, so later reads see a well-formed record. A stored
    /// status that disagrees with the expiry time is corrected and
    /// persisted.
    pub async fn load(&self) -> Result<SubscriptionRecord> {
        match self.store.load_user(self.account).await? {
            Some(doc) => match (doc.subscription_key, doc.expires_at) {
                (Some(subscription_key), Some(expires_at)) => {
                    let stored = doc.sub_status.unwrap_or(SubscriptionStatus::Active);
                    let mut record = SubscriptionRecord {
                        subscription_key,
                        expires_at,
                        status: stored,
                    };
                    let derived = record.derived_status(Utc::now());
                    if derived != stored {
                        record.status = derived;
                        self.store
                            .merge_user(self.account, UserPatch::status(derived))
                            .await?;
                    }
                    Ok(record)
                }
                _ => self.persist_sentinel().await,
            },
            None => self.persist_sentinel().await,
        }
    }

    async fn persist_sentinel(&self) -> Result<SubscriptionRecord> {
        let sentinel = SubscriptionRecord::sentinel();
        self.store
            .merge_user(self.account, UserPatch::subscription(&sentinel))
            .await?;
        Ok(sentinel)
    }
}

impl<'a, S: DocumentStore + Clone + 'static> SubscriptionService<'a, S> {
    /// Load the record and start a countdown monitor for it.
    pub async fn start_monitor(&self) -> Result<MonitorHandle> {
        let record = self.load().await?;
        Ok(MonitorHandle::spawn(
            self.store.clone(),
            self.account.to_string(),
            record,
        ))
    }
}

/// Point-in-time view of a monitored subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub status: SubscriptionStatus,
    pub remaining: Option<Remaining>,
}

/// Running countdown for one subscription record.
///
/// Owns the background ticker; dropping or cancelling the handle tears the
/// ticker down exactly once.
pub struct MonitorHandle {
    task: JoinHandle<()>,
    rx: watch::Receiver<MonitorSnapshot>,
}

impl MonitorHandle {
    pub fn spawn<S>(store: S, account: String, record: SubscriptionRecord) -> Self
    where
        S: DocumentStore + Clone + 'static,
    {
        let (status, remaining) = assess(record.expires_at, Utc::now());
        let (tx, rx) = watch::channel(MonitorSnapshot { status, remaining });

        let task = tokio::spawn(async move {
            let mut ticker = interval(config::MONITOR_TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last = record.status;
            loop {
                ticker.tick().await;
                let (status, remaining) = assess(record.expires_at, Utc::now());
                let _ = tx.send(MonitorSnapshot { status, remaining });
                if status != last {
                    last = status;
                    if let Err(err) = store
                        .merge_user(&account, UserPatch::status(status))
                        .await
                    {
                        warn!("failed to persist subscription status for {account}: {err}");
                    }
                }
                if status == SubscriptionStatus::Expired {
                    break;
                }
            }
        });

        Self { task, rx }
    }

    /// Latest assessment broadcast by the ticker.
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.rx.borrow().clone()
    }

    /// A receiver for callers that want to await each tick.
    pub fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.rx.clone()
    }

    /// True once the subscription expired and the ticker stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the ticker. Consumes the handle, so teardown happens once.
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
