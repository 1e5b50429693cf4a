//! Shared test fixtures for the re-listing SDK integration tests.
//!
//! Provides a scriptable [`MockApi`] that records every request it receives,
//! a [`MockChecker`] that fails a configured set of image URLs, and small
//! listing builders.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use relist_sdk::api::{CustomPostOutcome, MarketApi, PostOutcome, PurgeReport};
use relist_sdk::error::{RelistError, Result};
use relist_sdk::models::listing::{Listing, Photo, SubmissionPayload};
use relist_sdk::models::settings::ApiCredentials;
use relist_sdk::models::subscription::Activation;
use relist_sdk::ImageChecker;

/// Initialize logging for a test binary; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ---------------------------------------------------------------------------
// MockApi
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockState {
    /// Listings returned by `import_listings`.
    pub import_result: Vec<Listing>,
    /// URL batches received by `import_listings`.
    pub imported_urls: Vec<Vec<String>>,
    /// Every `(payload, global_stop)` received by `post_listing`.
    pub posted: Vec<(SubmissionPayload, bool)>,
    /// Scripted `post_listing` results, consumed front to back. When empty,
    /// each call succeeds with a generated task id.
    pub post_results: Vec<Result<PostOutcome>>,
    /// Payloads received by `post_custom_listing`.
    pub custom_posted: Vec<SubmissionPayload>,
    pub purge_result: PurgeReport,
    pub delete_calls: Vec<u32>,
    pub count_result: u64,
    pub urls_result: Vec<String>,
    /// Scripted activation result; `None` means the code is rejected.
    pub activation: Option<Result<Activation>>,
    pub activation_calls: Vec<(String, String)>,
    /// Scripted codes, consumed front to back.
    pub code_results: Vec<String>,
    pub generate_calls: Vec<(String, u32)>,
}

/// [`MarketApi`] double that records requests and replays scripted results.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_import(listings: Vec<Listing>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().import_result = listings;
        api
    }

    pub fn set_import(&self, listings: Vec<Listing>) {
        self.state.lock().unwrap().import_result = listings;
    }

    pub fn script_post(&self, result: Result<PostOutcome>) {
        self.state.lock().unwrap().post_results.push(result);
    }

    pub fn script_activation(&self, result: Result<Activation>) {
        self.state.lock().unwrap().activation = Some(result);
    }

    pub fn script_code(&self, code: &str) {
        self.state.lock().unwrap().code_results.push(code.to_string());
    }

    pub fn posted(&self) -> Vec<(SubmissionPayload, bool)> {
        self.state.lock().unwrap().posted.clone()
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().unwrap().posted.len()
    }

    pub fn imported_urls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().imported_urls.clone()
    }

    pub fn delete_calls(&self) -> Vec<u32> {
        self.state.lock().unwrap().delete_calls.clone()
    }

    pub fn generate_calls(&self) -> Vec<(String, u32)> {
        self.state.lock().unwrap().generate_calls.clone()
    }

    pub fn activation_calls(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().activation_calls.clone()
    }
}

#[async_trait::async_trait]
impl MarketApi for MockApi {
    async fn import_listings(
        &self,
        urls: &[String],
        _creds: &ApiCredentials,
    ) -> Result<Vec<Listing>> {
        let mut state = self.state.lock().unwrap();
        state.imported_urls.push(urls.to_vec());
        Ok(state.import_result.clone())
    }

    async fn post_listing(
        &self,
        payload: &SubmissionPayload,
        global_stop: bool,
    ) -> Result<PostOutcome> {
        let mut state = self.state.lock().unwrap();
        state.posted.push((payload.clone(), global_stop));
        if state.post_results.is_empty() {
            let n = state.posted.len();
            return Ok(PostOutcome {
                task_id: Some(format!("task-{n}")),
                stopped_tasks: Vec::new(),
            });
        }
        state.post_results.remove(0)
    }

    async fn post_custom_listing(&self, payload: &SubmissionPayload) -> Result<CustomPostOutcome> {
        let mut state = self.state.lock().unwrap();
        state.custom_posted.push(payload.clone());
        let n = state.custom_posted.len();
        Ok(CustomPostOutcome {
            listing_id: format!("custom-{n}"),
            listing_url: format!("https://gameflip.com/item/custom-{n}"),
        })
    }

    async fn delete_old_listings(
        &self,
        threshold_hours: u32,
        _creds: &ApiCredentials,
    ) -> Result<PurgeReport> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(threshold_hours);
        Ok(state.purge_result.clone())
    }

    async fn count_listings(&self, _creds: &ApiCredentials) -> Result<u64> {
        Ok(self.state.lock().unwrap().count_result)
    }

    async fn listing_urls(&self, _creds: &ApiCredentials) -> Result<Vec<String>> {
        Ok(self.state.lock().unwrap().urls_result.clone())
    }

    async fn activate_subscription(&self, user_token: &str, code: &str) -> Result<Activation> {
        let mut state = self.state.lock().unwrap();
        state
            .activation_calls
            .push((user_token.to_string(), code.to_string()));
        match state.activation.take() {
            Some(result) => result,
            None => Err(RelistError::Remote("Invalid subscription code".into())),
        }
    }

    async fn generate_subscription_code(
        &self,
        user_token: &str,
        duration_days: u32,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state
            .generate_calls
            .push((user_token.to_string(), duration_days));
        if state.code_results.is_empty() {
            let n = state.generate_calls.len();
            return Ok(format!("CODE-{n:04}"));
        }
        Ok(state.code_results.remove(0))
    }
}

// ---------------------------------------------------------------------------
// MockChecker
// ---------------------------------------------------------------------------

/// [`ImageChecker`] double: every URL resolves except the configured bad set.
#[derive(Default)]
pub struct MockChecker {
    bad: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing<S: AsRef<str>>(urls: &[S]) -> Self {
        Self {
            bad: urls.iter().map(|u| u.as_ref().to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ImageChecker for MockChecker {
    async fn verify(&self, url: &str) -> bool {
        self.calls.lock().unwrap().push(url.to_string());
        !self.bad.contains(url)
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn creds() -> ApiCredentials {
    ApiCredentials {
        api_key: "test-key".to_string(),
        api_secret: "test-secret".to_string(),
    }
}

pub fn image_url(id: &str) -> String {
    format!("https://images.example/{id}.jpg")
}

/// A minimal listing: id and name only.
pub fn bare_listing(id: &str, name: &str) -> Listing {
    Listing {
        id: id.to_string(),
        name: name.to_string(),
        kind: None,
        owner: None,
        description: None,
        category: None,
        platform: None,
        upc: None,
        price: None,
        accept_currency: None,
        tags: None,
        digital: None,
        digital_region: None,
        digital_deliverable: None,
        shipping_fee: None,
        shipping_paid_by: None,
        shipping_within_days: None,
        shipping_predefined_package: None,
        expire_in_days: None,
        visibility: None,
        cognitoidp_client: None,
        status: None,
        cover_photo: None,
        photo: None,
        extra: serde_json::Map::new(),
    }
}

/// A postable listing: priced, with a single cover photo at `image_url(id)`.
pub fn priced_listing(id: &str, name: &str, price: i64) -> Listing {
    let mut listing = bare_listing(id, name);
    listing.price = Some(price);
    let mut photos = BTreeMap::new();
    photos.insert(
        "p0".to_string(),
        Photo {
            view_url: Some(image_url(id)),
            extra: serde_json::Map::new(),
        },
    );
    listing.cover_photo = Some("p0".to_string());
    listing.photo = Some(photos);
    listing
}
