//! Bulk re-listing SDK for a digital marketplace.
//!
//! Provides a high-level client for importing existing marketplace listings
//! into a per-account collection, re-posting them in rate-limited batches,
//! purging stale posts, and tracking the account's subscription lifecycle
//! (countdown, expiry, code issuance and redemption).
//!
//! # Quick start
//!
//! ```no_run
//! use relist_sdk::{MemoryStore, RelistSdk};
//!
//! # async fn run() -> relist_sdk::Result<()> {
//! let sdk = RelistSdk::builder()
//!     .account("acct_1")
//!     .credentials("my-api-key", "my-api-secret")
//!     .build(MemoryStore::new())?;
//!
//! // Import listings by URL, then re-post the whole collection.
//! sdk.importer().import(&["https://gameflip.com/item/abc".into()]).await?;
//! let saved = sdk.importer().saved().await?;
//! let report = sdk.poster().post_batch(&saved, None).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod images;
pub mod models;
pub mod services;
pub mod store;

pub use api::{CustomPostOutcome, HttpMarketApi, MarketApi, PostOutcome, PurgeReport};
pub use error::{RelistError, Result};
pub use images::{HttpImageChecker, ImageChecker, ImageUploader};
pub use models::listing::{Listing, Photo, SubmissionPayload};
pub use models::settings::{AccountSettings, ApiCredentials};
pub use models::subscription::{Remaining, SubscriptionRecord, SubscriptionStatus};
pub use models::task::{BatchReport, PostTask, TaskState};
pub use services::{FlowState, MonitorHandle, MonitorSnapshot};
pub use store::{DocumentStore, MemoryStore, UserDocument, UserPatch};

use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use services::{
    Cleaner, CodeService, FlowTracker, Importer, PostRunner, SubscriptionService,
};

// ---------------------------------------------------------------------------
// RelistSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`RelistSdk`] instance.
///
/// Use [`RelistSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](RelistSdkBuilder::build) to create the SDK.
pub struct RelistSdkBuilder {
    base_url: String,
    timeout: Duration,
    account: Option<String>,
    privileged_account: Option<String>,
    credentials: Option<ApiCredentials>,
    uploader: Option<(String, String)>,
}

impl Default for RelistSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: config::DEFAULT_BASE_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            account: None,
            privileged_account: None,
            credentials: None,
            uploader: None,
        }
    }
}

impl RelistSdkBuilder {
    /// Set the base URL of the remote listing API.
    ///
    /// Defaults to the local development server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the HTTP request timeout for all remote calls.
    ///
    /// Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the account id all document reads and writes are scoped to.
    /// Required.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Set the account allowed to issue subscription codes.
    ///
    /// When unset, no account is privileged and code issuance is rejected
    /// locally.
    pub fn privileged_account(mut self, account: impl Into<String>) -> Self {
        self.privileged_account = Some(account.into());
        self
    }

    /// Set the marketplace API credentials used for imports, submissions and
    /// deletes.
    pub fn credentials(
        mut self,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.credentials = Some(ApiCredentials {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        });
        self
    }

    /// Configure the external image host used for custom-listing photos.
    pub fn image_uploader(
        mut self,
        endpoint: impl Into<String>,
        upload_preset: impl Into<String>,
    ) -> Self {
        self.uploader = Some((endpoint.into(), upload_preset.into()));
        self
    }

    /// Build the SDK against the given datastore.
    ///
    /// Constructs the HTTP clients but performs no network calls; nothing is
    /// fetched until the first operation.
    pub fn build<S: DocumentStore>(self, store: S) -> Result<RelistSdk<S>> {
        let account = self
            .account
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| RelistError::Validation("an account id is required".into()))?;

        let api = HttpMarketApi::new(self.base_url.clone(), self.timeout)?;
        let images = HttpImageChecker::new(self.timeout)?;
        let uploader = match self.uploader {
            Some((endpoint, preset)) => Some(ImageUploader::new(endpoint, preset, self.timeout)?),
            None => None,
        };

        Ok(RelistSdk {
            api,
            images,
            store,
            base_url: self.base_url,
            account,
            privileged_account: self.privileged_account.unwrap_or_default(),
            creds: self.credentials.unwrap_or_default(),
            uploader,
            flow: Mutex::new(FlowTracker::new()),
        })
    }
}

// ---------------------------------------------------------------------------
// RelistSdk
// ---------------------------------------------------------------------------

/// The main entry point for the re-listing SDK.
///
/// Owns the HTTP clients and the datastore handle and exposes the flows as
/// lightweight borrowing service wrappers, all scoped to one account.
///
/// Created via [`RelistSdk::builder()`].
#[derive(Debug)]
pub struct RelistSdk<S: DocumentStore> {
    api: HttpMarketApi,
    images: HttpImageChecker,
    store: S,
    base_url: String,
    account: String,
    privileged_account: String,
    creds: ApiCredentials,
    uploader: Option<ImageUploader>,
    flow: Mutex<FlowTracker>,
}

impl RelistSdk<MemoryStore> {
    /// Create a new builder for configuring the SDK.
    ///
    /// The datastore implementation is chosen when
    /// [`build`](RelistSdkBuilder::build) is called.
    pub fn builder() -> RelistSdkBuilder {
        RelistSdkBuilder::default()
    }
}

impl<S: DocumentStore> RelistSdk<S> {
    // -- Service accessors -------------------------------------------------

    /// Access the listing import and collection-maintenance interface.
    ///
    /// Returns a lightweight wrapper that borrows from the SDK's clients and
    /// datastore handle.
    pub fn importer(&self) -> Importer<'_, HttpMarketApi, S> {
        Importer::new(&self.api, &self.store, &self.account, &self.creds)
    }

    /// Access the batch posting orchestrator.
    pub fn poster(&self) -> PostRunner<'_, HttpMarketApi, HttpImageChecker> {
        PostRunner::new(&self.api, &self.images, &self.creds)
    }

    /// Access the stale-listing cleanup interface.
    pub fn cleaner(&self) -> Cleaner<'_, HttpMarketApi> {
        Cleaner::new(&self.api, &self.creds)
    }

    /// Access the subscription record interface.
    pub fn subscription(&self) -> SubscriptionService<'_, S> {
        SubscriptionService::new(&self.store, &self.account)
    }

    /// Access the subscription code issuance/redemption interface.
    pub fn codes(&self) -> CodeService<'_, HttpMarketApi, S> {
        CodeService::new(
            &self.api,
            &self.store,
            &self.account,
            &self.privileged_account,
        )
    }

    // -- Remote passthroughs -----------------------------------------------

    /// Number of listings currently posted on the marketplace account.
    pub async fn count_listings(&self) -> Result<u64> {
        self.api.count_listings(&self.creds).await
    }

    /// The marketplace account's listing URLs, suitable for re-import.
    pub async fn listing_urls(&self) -> Result<Vec<String>> {
        self.api.listing_urls(&self.creds).await
    }

    // -- Settings ----------------------------------------------------------

    /// Load the account's persisted settings.
    ///
    /// Missing fields fall back to defaults, and an account document that
    /// lacked any of them gets the defaults written back so later reads are
    /// fully populated.
    pub async fn load_settings(&self) -> Result<AccountSettings> {
        let doc = self.store.load_user(&self.account).await?;
        let defaults = AccountSettings::default();
        let (settings, complete) = match doc {
            Some(doc) => {
                let complete = doc.api_key.is_some()
                    && doc.api_secret.is_some()
                    && doc.time_between_listings.is_some()
                    && doc.delete_listings_hours.is_some();
                let settings = AccountSettings {
                    api_key: doc.api_key.unwrap_or(defaults.api_key),
                    api_secret: doc.api_secret.unwrap_or(defaults.api_secret),
                    time_between_listings: doc
                        .time_between_listings
                        .unwrap_or(defaults.time_between_listings),
                    delete_listings_hours: doc
                        .delete_listings_hours
                        .unwrap_or(defaults.delete_listings_hours),
                };
                (settings, complete)
            }
            None => (defaults, false),
        };
        if !complete {
            self.save_settings(&settings).await?;
        }
        Ok(settings)
    }

    /// Merge-write the account's settings document.
    pub async fn save_settings(&self, settings: &AccountSettings) -> Result<()> {
        let patch = UserPatch {
            api_key: Some(settings.api_key.clone()),
            api_secret: Some(settings.api_secret.clone()),
            time_between_listings: Some(settings.time_between_listings),
            delete_listings_hours: Some(settings.delete_listings_hours),
            ..UserPatch::default()
        };
        self.store.merge_user(&self.account, patch).await
    }

    /// Replace the in-memory marketplace credentials, e.g. after
    /// [`load_settings`](Self::load_settings).
    pub fn set_credentials(&mut self, creds: ApiCredentials) {
        self.creds = creds;
    }

    pub fn credentials(&self) -> &ApiCredentials {
        &self.creds
    }

    /// The configured image-host uploader, when one was set on the builder.
    pub fn uploader(&self) -> Option<&ImageUploader> {
        self.uploader.as_ref()
    }

    // -- Posting flow state ------------------------------------------------

    /// Current posting flow state for this session.
    pub fn flow_state(&self) -> Result<FlowState> {
        let flow = self
            .flow
            .lock()
            .map_err(|_| RelistError::Store("flow tracker lock poisoned".into()))?;
        Ok(flow.state())
    }

    /// Move the posting flow to `next`, rejecting transitions outside the
    /// table.
    pub fn transition_flow(&self, next: FlowState) -> Result<()> {
        let mut flow = self
            .flow
            .lock()
            .map_err(|_| RelistError::Store("flow tracker lock poisoned".into()))?;
        flow.transition(next)
    }
}

impl<S: DocumentStore + Clone + 'static> RelistSdk<S> {
    /// Load the subscription record and start its countdown monitor.
    ///
    /// The returned handle broadcasts one snapshot per tick and persists
    /// status transitions; dropping it stops the ticker.
    pub async fn start_monitor(&self) -> Result<MonitorHandle> {
        self.subscription().start_monitor().await
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl<S: DocumentStore> fmt::Display for RelistSdk<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RelistSdk(account={}, base_url={})",
            self.account, self.base_url
        )
    }
}
