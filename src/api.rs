//! Client for the remote listing-creation REST API.
//!
//! Endpoints are consumed as black boxes characterized only by their
//! request/response contracts; [`MarketApi`] is the seam that lets the
//! orchestration services run against a mock in tests.

use std::time::Duration;

use log::error;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config;
use crate::error::{RelistError, Result};
use crate::models::listing::{Listing, SubmissionPayload};
use crate::models::settings::ApiCredentials;
use crate::models::subscription::{parse_expires_at, Activation};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Declared-success response of the submission endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostOutcome {
    /// Remote handle for the accepted submission.
    pub task_id: Option<String>,
    /// Task ids halted by a `global_stop` control request.
    pub stopped_tasks: Vec<String>,
}

/// Result of a single custom-listing creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomPostOutcome {
    pub listing_id: String,
    pub listing_url: String,
}

/// Counts reported by the bulk-delete endpoint; the remote side performs all
/// filtering, so there is no partial-success model beyond these totals.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PurgeReport {
    #[serde(default)]
    pub drafted: u64,
    #[serde(default)]
    pub deleted: u64,
    #[serde(default)]
    pub failed_draft: u64,
    #[serde(default)]
    pub failed_delete: u64,
}

// ---------------------------------------------------------------------------
// MarketApi
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
pub trait MarketApi: Send + Sync {
    /// Resolve a batch of marketplace URLs into full listing documents.
    /// URLs the remote side cannot resolve are omitted from the result.
    async fn import_listings(
        &self,
        urls: &[String],
        creds: &ApiCredentials,
    ) -> Result<Vec<Listing>>;

    /// Submit one listing, or — with `global_stop` — send the control request
    /// that halts every in-flight task for the account.
    async fn post_listing(
        &self,
        payload: &SubmissionPayload,
        global_stop: bool,
    ) -> Result<PostOutcome>;

    /// Create a single custom listing and return its public URL.
    async fn post_custom_listing(&self, payload: &SubmissionPayload) -> Result<CustomPostOutcome>;

    /// Bulk-delete listings older than the threshold; filtering happens
    /// entirely on the remote side.
    async fn delete_old_listings(
        &self,
        threshold_hours: u32,
        creds: &ApiCredentials,
    ) -> Result<PurgeReport>;

    async fn count_listings(&self, creds: &ApiCredentials) -> Result<u64>;

    /// Fetch the account's listing URLs for re-import.
    async fn listing_urls(&self, creds: &ApiCredentials) -> Result<Vec<String>>;

    /// Validate and consume a subscription code, yielding the new expiry.
    async fn activate_subscription(&self, user_token: &str, code: &str) -> Result<Activation>;

    /// Mint a time-boxed subscription code (remote enforces the privileged
    /// identity as well).
    async fn generate_subscription_code(
        &self,
        user_token: &str,
        duration_days: u32,
    ) -> Result<String>;
}

// ---------------------------------------------------------------------------
// HttpMarketApi
// ---------------------------------------------------------------------------

/// [`MarketApi`] implementation over reqwest.
#[derive(Debug)]
pub struct HttpMarketApi {
    base_url: String,
    client: Client,
}

impl HttpMarketApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Read a response body, mapping non-success statuses to the error
    /// taxonomy. The server-supplied `detail` field is surfaced verbatim; a
    /// 422 carrying the listing-limit marker becomes
    /// [`RelistError::ListingLimit`].
    async fn read_body(resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        let text = resp.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
        if !status.is_success() {
            let detail = body
                .get("detail")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            error!("remote API rejected request: {detail}");
            if status == StatusCode::UNPROCESSABLE_ENTITY
                && detail.to_lowercase().contains(config::LISTING_LIMIT_MARKER)
            {
                return Err(RelistError::ListingLimit(detail));
            }
            return Err(RelistError::Remote(detail));
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl MarketApi for HttpMarketApi {
    async fn import_listings(
        &self,
        urls: &[String],
        creds: &ApiCredentials,
    ) -> Result<Vec<Listing>> {
        let resp = self
            .client
            .post(self.url(config::IMPORT_LISTINGS_PATH))
            .json(&serde_json::json!({
                "urls": urls,
                "api_key": creds.api_key,
                "api_secret": creds.api_secret,
            }))
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        let data = body.get("data").cloned().unwrap_or(Value::Array(vec![]));
        Ok(serde_json::from_value(data)?)
    }

    async fn post_listing(
        &self,
        payload: &SubmissionPayload,
        global_stop: bool,
    ) -> Result<PostOutcome> {
        let resp = self
            .client
            .post(self.url(config::POST_LISTING_PATH))
            .query(&[("global_stop", global_stop)])
            .json(payload)
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        let declared = body.get("status").and_then(Value::as_str).unwrap_or("");
        if declared != "SUCCESS" {
            return Err(RelistError::Remote(format!(
                "Failed posting for listing: {}",
                payload.name
            )));
        }
        Ok(PostOutcome {
            task_id: body
                .get("task_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            stopped_tasks: body
                .get("stopped_tasks")
                .and_then(Value::as_array)
                .map(|arr| {
                    arr.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    async fn post_custom_listing(&self, payload: &SubmissionPayload) -> Result<CustomPostOutcome> {
        let resp = self
            .client
            .post(self.url(config::CUSTOM_POST_LISTING_PATH))
            .json(payload)
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        let declared = body.get("status").and_then(Value::as_str).unwrap_or("");
        if declared != "SUCCESS" {
            return Err(RelistError::Remote(format!(
                "Failed posting for listing: {}",
                payload.name
            )));
        }
        let listing_id = body
            .get("listing_id")
            .and_then(Value::as_str)
            .ok_or_else(|| RelistError::Remote("response missing listing_id".into()))?
            .to_string();
        let listing_url = body
            .get("listing_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://gameflip.com/item/{listing_id}"));
        Ok(CustomPostOutcome {
            listing_id,
            listing_url,
        })
    }

    async fn delete_old_listings(
        &self,
        threshold_hours: u32,
        creds: &ApiCredentials,
    ) -> Result<PurgeReport> {
        let resp = self
            .client
            .post(self.url(config::DELETE_OLD_LISTINGS_PATH))
            .json(&serde_json::json!({
                "delete_threshold": threshold_hours,
                "api_key": creds.api_key,
                "api_secret": creds.api_secret,
            }))
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        let results = body.get("results").cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(results).unwrap_or_default())
    }

    async fn count_listings(&self, creds: &ApiCredentials) -> Result<u64> {
        let resp = self
            .client
            .get(self.url(config::COUNT_LISTINGS_PATH))
            .query(&[
                ("apiKey", creds.api_key.as_str()),
                ("apiSecret", creds.api_secret.as_str()),
            ])
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        Ok(body
            .get("total_listings")
            .and_then(Value::as_u64)
            .unwrap_or(0))
    }

    async fn listing_urls(&self, creds: &ApiCredentials) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(self.url(config::LISTING_URLS_PATH))
            .header("apiKey", &creds.api_key)
            .header("apiSecret", &creds.api_secret)
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        Ok(body
            .get("urls")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn activate_subscription(&self, user_token: &str, code: &str) -> Result<Activation> {
        let resp = self
            .client
            .post(self.url(config::ACTIVATE_SUBSCRIPTION_PATH))
            .json(&serde_json::json!({
                "user_token": user_token,
                "subscription_code": code,
            }))
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        let subscription_key = body
            .get("subscription_key")
            .and_then(Value::as_str)
            .ok_or_else(|| RelistError::Remote("response missing subscription_key".into()))?
            .to_string();
        let raw_expiry = body
            .get("expires_at")
            .and_then(Value::as_str)
            .ok_or_else(|| RelistError::Remote("response missing expires_at".into()))?;
        Ok(Activation {
            subscription_key,
            expires_at: parse_expires_at(raw_expiry)?,
        })
    }

    async fn generate_subscription_code(
        &self,
        user_token: &str,
        duration_days: u32,
    ) -> Result<String> {
        let resp = self
            .client
            .get(self.url(config::GENERATE_CODE_PATH))
            .query(&[
                ("user_token", user_token),
                ("duration", &duration_days.to_string()),
            ])
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        body.get("subscription_code")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RelistError::Remote("response missing subscription_code".into()))
    }
}
