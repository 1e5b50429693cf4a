use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::models::settings::ApiCredentials;

// ---------------------------------------------------------------------------
// Listing — one sellable item, mirroring the remote wire format
// ---------------------------------------------------------------------------

/// A single photo entry inside a listing's photo map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub view_url: Option<String>,
    /// Fields the crate does not interpret (status, display_order, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One sellable item record, mirrored between the local collection and the
/// remote marketplace.
///
/// Every field except `id` and `name` is optional: imported listings arrive
/// with whatever subset the remote side stored, and unknown fields are
/// preserved verbatim in `extra` so a listing round-trips unchanged through
/// the datastore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,
    /// Price in integer minor currency units (cents).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_currency: Option<String>,
    /// Ordered tag list, each conventionally `"key: value"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_deliverable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_paid_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_within_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_predefined_package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_in_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cognitoidp_client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Key of the cover photo inside `photo`, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    /// Photo map keyed by the remote photo id. `BTreeMap` keeps derivation
    /// of image URL lists deterministic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<BTreeMap<String, Photo>>,
    /// Unrecognized fields, carried through verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Listing {
    /// The cover photo's view URL: looks up `cover_photo` in the photo map.
    ///
    /// Returns `None` when the cover key is unset, absent from the map, or
    /// the entry has no non-empty URL.
    pub fn primary_image_url(&self) -> Option<&str> {
        let key = self.cover_photo.as_deref()?;
        let photo = self.photo.as_ref()?.get(key)?;
        photo
            .view_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Every non-empty view URL in the photo map, in key order.
    ///
    /// The cover photo's URL is included here as well, matching what the
    /// remote submission expects in `additional_images`.
    pub fn additional_image_urls(&self) -> Vec<&str> {
        self.photo
            .iter()
            .flat_map(|map| map.values())
            .filter_map(|photo| photo.view_url.as_deref())
            .filter(|url| !url.trim().is_empty())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SubmissionPayload — the fully-defaulted remote request body
// ---------------------------------------------------------------------------

/// The request body for `POST /post-listing-with-image`.
///
/// Unlike [`Listing`], every field here is concrete: missing optional fields
/// are replaced by fixed fallbacks so the remote API never receives nulls
/// where it expects values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub kind: String,
    pub owner: String,
    pub status: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub platform: String,
    pub upc: String,
    pub price: i64,
    pub accept_currency: String,
    pub shipping_within_days: i64,
    pub expire_in_days: i64,
    pub shipping_fee: i64,
    pub shipping_paid_by: String,
    pub shipping_predefined_package: String,
    pub cognitoidp_client: String,
    pub tags: Vec<String>,
    pub digital: bool,
    pub digital_region: String,
    pub digital_deliverable: String,
    pub visibility: String,
    pub image_url: Option<String>,
    pub additional_images: Vec<String>,
    pub api_key: String,
    pub api_secret: String,
    pub time_between_listings: u64,
}

impl SubmissionPayload {
    /// Build the remote payload for one listing, defaulting every missing
    /// optional field.
    pub fn from_listing(
        listing: &Listing,
        creds: &ApiCredentials,
        time_between_listings: u64,
    ) -> Self {
        Self {
            kind: or_fallback(&listing.kind, config::FALLBACK_KIND),
            owner: listing.owner.clone().unwrap_or_default(),
            status: config::SUBMISSION_STATUS.to_string(),
            name: listing.name.clone(),
            description: listing.description.clone().unwrap_or_default(),
            category: or_fallback(&listing.category, config::FALLBACK_CATEGORY),
            platform: or_fallback(&listing.platform, config::FALLBACK_PLATFORM),
            upc: listing.upc.clone().unwrap_or_default(),
            price: listing.price.unwrap_or(0),
            accept_currency: or_fallback(&listing.accept_currency, config::FALLBACK_CURRENCY),
            shipping_within_days: listing
                .shipping_within_days
                .unwrap_or(config::FALLBACK_SHIPPING_WITHIN_DAYS),
            expire_in_days: listing
                .expire_in_days
                .unwrap_or(config::FALLBACK_EXPIRE_IN_DAYS),
            shipping_fee: 0,
            shipping_paid_by: or_fallback(
                &listing.shipping_paid_by,
                config::FALLBACK_SHIPPING_PAID_BY,
            ),
            shipping_predefined_package: or_fallback(
                &listing.shipping_predefined_package,
                config::FALLBACK_SHIPPING_PACKAGE,
            ),
            cognitoidp_client: listing.cognitoidp_client.clone().unwrap_or_default(),
            tags: listing.tags.clone().unwrap_or_else(config::fallback_tags),
            digital: listing.digital.unwrap_or(true),
            digital_region: or_fallback(&listing.digital_region, config::FALLBACK_DIGITAL_REGION),
            digital_deliverable: or_fallback(
                &listing.digital_deliverable,
                config::FALLBACK_DELIVERABLE,
            ),
            visibility: or_fallback(&listing.visibility, config::FALLBACK_VISIBILITY),
            image_url: listing.primary_image_url().map(str::to_string),
            additional_images: listing
                .additional_image_urls()
                .into_iter()
                .map(str::to_string)
                .collect(),
            api_key: creds.api_key.clone(),
            api_secret: creds.api_secret.clone(),
            time_between_listings,
        }
    }

    /// A placeholder body for the global-stop control request. Task state is
    /// not reliably retained across sessions, so the stop signal names no
    /// task ids; the remote side is the authority on what is in flight.
    pub fn stop_marker(creds: &ApiCredentials) -> Self {
        Self {
            kind: config::FALLBACK_KIND.to_string(),
            owner: "dummy_owner".to_string(),
            status: config::SUBMISSION_STATUS.to_string(),
            name: "Stopping all tasks".to_string(),
            description: "This is a dummy listing to stop all tasks".to_string(),
            category: config::FALLBACK_CATEGORY.to_string(),
            platform: config::FALLBACK_PLATFORM.to_string(),
            upc: "000000000000".to_string(),
            price: 0,
            accept_currency: config::FALLBACK_CURRENCY.to_string(),
            shipping_within_days: 1,
            expire_in_days: 1,
            shipping_fee: 0,
            shipping_paid_by: config::FALLBACK_SHIPPING_PAID_BY.to_string(),
            shipping_predefined_package: config::FALLBACK_SHIPPING_PACKAGE.to_string(),
            cognitoidp_client: "dummy".to_string(),
            tags: Vec::new(),
            digital: true,
            digital_region: config::FALLBACK_DIGITAL_REGION.to_string(),
            digital_deliverable: config::FALLBACK_DELIVERABLE.to_string(),
            visibility: "private".to_string(),
            image_url: None,
            additional_images: Vec::new(),
            api_key: creds.api_key.clone(),
            api_secret: creds.api_secret.clone(),
            time_between_listings: 0,
        }
    }
}

fn or_fallback(value: &Option<String>, fallback: &str) -> String {
    value.clone().unwrap_or_else(|| fallback.to_string())
}
