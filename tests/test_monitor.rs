//! Subscription assessment and countdown monitor tests.

mod common;

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use relist_sdk::services::{assess, SubscriptionService};
use relist_sdk::store::DocumentStore;
use relist_sdk::{MemoryStore, SubscriptionRecord, SubscriptionStatus, UserPatch};

// ---------------------------------------------------------------------------
// assess
// ---------------------------------------------------------------------------

#[test]
fn an_expiry_at_or_before_now_is_expired() {
    let now = Utc::now();
    let (status, remaining) = assess(now, now);
    assert_eq!(status, SubscriptionStatus::Expired);
    assert!(remaining.is_none());

    let (status, _) = assess(now - TimeDelta::seconds(1), now);
    assert_eq!(status, SubscriptionStatus::Expired);
}

#[test]
fn a_future_expiry_is_active_with_a_countdown() {
    let now = Utc::now();
    let expires = now
        + TimeDelta::days(2)
        + TimeDelta::hours(3)
        + TimeDelta::minutes(4)
        + TimeDelta::seconds(5);

    let (status, remaining) = assess(expires, now);
    assert_eq!(status, SubscriptionStatus::Active);
    let remaining = remaining.unwrap();
    assert_eq!(remaining.days, 2);
    assert_eq!(remaining.hours, 3);
    assert_eq!(remaining.minutes, 4);
    assert_eq!(remaining.seconds, 5);
    assert_eq!(remaining.to_string(), "2d 3h 4m 5s");
}

#[test]
fn one_second_left_is_still_active() {
    let now = Utc::now();
    let (status, remaining) = assess(now + TimeDelta::seconds(1), now);
    assert_eq!(status, SubscriptionStatus::Active);
    assert_eq!(remaining.unwrap().seconds, 1);
}

// ---------------------------------------------------------------------------
// SubscriptionService::load
// ---------------------------------------------------------------------------

#[tokio::test]
async fn loading_an_account_without_a_subscription_persists_the_sentinel() {
    let store = MemoryStore::new();
    let service = SubscriptionService::new(&store, "acct");

    let record = service.load().await.unwrap();
    assert_eq!(record, SubscriptionRecord::sentinel());
    assert_eq!(record.status, SubscriptionStatus::Expired);

    let doc = store.load_user("acct").await.unwrap().unwrap();
    assert_eq!(doc.subscription_key.as_deref(), Some(""));
    assert_eq!(doc.sub_status, Some(SubscriptionStatus::Expired));
}

#[tokio::test]
async fn loading_corrects_a_stale_active_status() {
    let store = MemoryStore::new();
    let expired = SubscriptionRecord {
        subscription_key: "sub-1".to_string(),
        expires_at: Utc::now() - TimeDelta::hours(1),
        status: SubscriptionStatus::Active,
    };
    store
        .merge_user("acct", UserPatch::subscription(&expired))
        .await
        .unwrap();

    let service = SubscriptionService::new(&store, "acct");
    let record = service.load().await.unwrap();
    assert_eq!(record.status, SubscriptionStatus::Expired);

    let doc = store.load_user("acct").await.unwrap().unwrap();
    assert_eq!(doc.sub_status, Some(SubscriptionStatus::Expired));
}

#[tokio::test]
async fn loading_an_active_subscription_leaves_it_untouched() {
    let store = MemoryStore::new();
    let active = SubscriptionRecord {
        subscription_key: "sub-1".to_string(),
        expires_at: Utc::now() + TimeDelta::days(30),
        status: SubscriptionStatus::Active,
    };
    store
        .merge_user("acct", UserPatch::subscription(&active))
        .await
        .unwrap();

    let service = SubscriptionService::new(&store, "acct");
    let record = service.load().await.unwrap();
    assert_eq!(record.subscription_key, "sub-1");
    assert_eq!(record.status, SubscriptionStatus::Active);
}

// ---------------------------------------------------------------------------
// MonitorHandle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn monitor_persists_expiry_and_stops_ticking() {
    common::init_logging();
    let store = MemoryStore::new();
    let active = SubscriptionRecord {
        subscription_key: "sub-1".to_string(),
        expires_at: Utc::now() + TimeDelta::seconds(2),
        status: SubscriptionStatus::Active,
    };
    store
        .merge_user("acct", UserPatch::subscription(&active))
        .await
        .unwrap();

    let service = SubscriptionService::new(&store, "acct");
    let handle = service.start_monitor().await.unwrap();
    assert_eq!(handle.snapshot().status, SubscriptionStatus::Active);

    // Let the countdown run past the expiry and the ticker wind down.
    for _ in 0..12 {
        tokio::time::sleep(Duration::from_millis(500)).await;
        if handle.is_finished() {
            break;
        }
    }
    assert!(handle.is_finished());
    assert_eq!(handle.snapshot().status, SubscriptionStatus::Expired);
    assert!(handle.snapshot().remaining.is_none());

    let doc = store.load_user("acct").await.unwrap().unwrap();
    assert_eq!(doc.sub_status, Some(SubscriptionStatus::Expired));
}

#[tokio::test]
async fn monitor_broadcasts_countdown_snapshots() {
    let store = MemoryStore::new();
    let active = SubscriptionRecord {
        subscription_key: "sub-1".to_string(),
        expires_at: Utc::now() + TimeDelta::days(1),
        status: SubscriptionStatus::Active,
    };
    store
        .merge_user("acct", UserPatch::subscription(&active))
        .await
        .unwrap();

    let service = SubscriptionService::new(&store, "acct");
    let handle = service.start_monitor().await.unwrap();
    let mut rx = handle.subscribe();

    rx.changed().await.unwrap();
    let snapshot = rx.borrow().clone();
    assert_eq!(snapshot.status, SubscriptionStatus::Active);
    assert!(snapshot.remaining.is_some());

    handle.cancel();
}

#[tokio::test]
async fn an_already_expired_record_finishes_on_the_first_tick() {
    let store = MemoryStore::new();
    let service = SubscriptionService::new(&store, "acct");

    // No subscription at all: the sentinel record is already expired.
    let handle = service.start_monitor().await.unwrap();
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        if handle.is_finished() {
            break;
        }
    }
    assert!(handle.is_finished());
    assert_eq!(handle.snapshot().status, SubscriptionStatus::Expired);
}
