//! Document-oriented datastore seam.
//!
//! The core reads and writes whole documents by key; replication and
//! consistency internals of the real datastore are not modeled. Writes are
//! last-writer-wins with no concurrency token, which callers of
//! read-merge-write flows must assume.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RelistError, Result};
use crate::models::listing::Listing;
use crate::models::subscription::{SubscriptionRecord, SubscriptionStatus};

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// The per-account document at `users/{accountId}`.
///
/// Field names follow the historical persisted layout, which mixes camelCase
/// and snake_case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(rename = "apiSecret", default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
    #[serde(
        rename = "timeBetweenListings",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub time_between_listings: Option<u64>,
    #[serde(
        rename = "deleteListingsHours",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub delete_listings_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "subStatus", default, skip_serializing_if = "Option::is_none")]
    pub sub_status: Option<SubscriptionStatus>,
    #[serde(default)]
    pub generated_subscription_codes: Vec<String>,
}

/// A merge-write against a [`UserDocument`]: only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub time_between_listings: Option<u64>,
    pub delete_listings_hours: Option<u32>,
    pub subscription_key: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub sub_status: Option<SubscriptionStatus>,
    pub generated_subscription_codes: Option<Vec<String>>,
}

impl UserPatch {
    /// Patch touching only the subscription status field.
    pub fn status(status: SubscriptionStatus) -> Self {
        Self {
            sub_status: Some(status),
            ..Self::default()
        }
    }

    /// Patch replacing the outstanding-codes list.
    pub fn codes(codes: Vec<String>) -> Self {
        Self {
            generated_subscription_codes: Some(codes),
            ..Self::default()
        }
    }

    /// Patch writing a whole subscription record.
    pub fn subscription(record: &SubscriptionRecord) -> Self {
        Self {
            subscription_key: Some(record.subscription_key.clone()),
            expires_at: Some(record.expires_at),
            sub_status: Some(record.status),
            ..Self::default()
        }
    }

    fn apply(self, doc: &mut UserDocument) {
        if let Some(v) = self.api_key {
            doc.api_key = Some(v);
        }
        if let Some(v) = self.api_secret {
            doc.api_secret = Some(v);
        }
        if let Some(v) = self.time_between_listings {
            doc.time_between_listings = Some(v);
        }
        if let Some(v) = self.delete_listings_hours {
            doc.delete_listings_hours = Some(v);
        }
        if let Some(v) = self.subscription_key {
            doc.subscription_key = Some(v);
        }
        if let Some(v) = self.expires_at {
            doc.expires_at = Some(v);
        }
        if let Some(v) = self.sub_status {
            doc.sub_status = Some(v);
        }
        if let Some(v) = self.generated_subscription_codes {
            doc.generated_subscription_codes = v;
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

/// Whole-document access to the per-account tree.
///
/// `load_listings`/`save_listings` address the single
/// `users/{accountId}/importedListings/allListings` collection document; it
/// is replaced wholesale on save, never patched incrementally.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load_user(&self, account: &str) -> Result<Option<UserDocument>>;

    /// Merge-write of only the supplied fields; creates the document when it
    /// does not exist.
    async fn merge_user(&self, account: &str, patch: UserPatch) -> Result<()>;

    /// `None` means the collection document was never created, which callers
    /// surface as a missing-document error rather than an empty collection.
    async fn load_listings(&self, account: &str) -> Result<Option<Vec<Listing>>>;

    async fn save_listings(&self, account: &str, listings: Vec<Listing>) -> Result<()>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory [`DocumentStore`] used by tests and demos. Cloning shares the
/// underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    users: HashMap<String, UserDocument>,
    listings: HashMap<String, Vec<Listing>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| RelistError::Store("memory store lock poisoned".into()))
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn load_user(&self, account: &str) -> Result<Option<UserDocument>> {
        Ok(self.lock()?.users.get(account).cloned())
    }

    async fn merge_user(&self, account: &str, patch: UserPatch) -> Result<()> {
        let mut inner = self.lock()?;
        let doc = inner.users.entry(account.to_string()).or_default();
        patch.apply(doc);
        Ok(())
    }

    async fn load_listings(&self, account: &str) -> Result<Option<Vec<Listing>>> {
        Ok(self.lock()?.listings.get(account).cloned())
    }

    async fn save_listings(&self, account: &str, listings: Vec<Listing>) -> Result<()> {
        self.lock()?.listings.insert(account.to_string(), listings);
        Ok(())
    }
}
