use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

// Remote listing API paths, relative to the base URL.
pub const IMPORT_LISTINGS_PATH: &str = "/import-listings";
pub const POST_LISTING_PATH: &str = "/post-listing-with-image";
pub const CUSTOM_POST_LISTING_PATH: &str = "/custom-post-listing";
pub const DELETE_OLD_LISTINGS_PATH: &str = "/delete-old-listings";
pub const COUNT_LISTINGS_PATH: &str = "/count-listings";
pub const LISTING_URLS_PATH: &str = "/gameflip/listings";
pub const ACTIVATE_SUBSCRIPTION_PATH: &str = "/activate-subscription";
pub const GENERATE_CODE_PATH: &str = "/generate-subscription-code";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Cooperative wait between submissions when the caller does not supply one.
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_secs(5);

/// Age threshold used by the bulk-delete flow when no setting is stored.
pub const DEFAULT_DELETE_HOURS: u32 = 1;

/// Period of the subscription countdown evaluation.
pub const MONITOR_TICK: Duration = Duration::from_secs(1);

/// Marker the remote API includes in the rejection detail when the account's
/// listing limit is reached.
pub const LISTING_LIMIT_MARKER: &str = "listing limit";

// Fallback values applied when a listing is missing an optional field, so the
// remote API never receives nulls where it expects values.
pub const FALLBACK_KIND: &str = "item";
pub const FALLBACK_CATEGORY: &str = "DIGITAL_INGAME";
pub const FALLBACK_PLATFORM: &str = "unknown";
pub const FALLBACK_CURRENCY: &str = "USD";
pub const FALLBACK_SHIPPING_PAID_BY: &str = "seller";
pub const FALLBACK_SHIPPING_PACKAGE: &str = "None";
pub const FALLBACK_SHIPPING_WITHIN_DAYS: i64 = 3;
pub const FALLBACK_EXPIRE_IN_DAYS: i64 = 7;
pub const FALLBACK_DIGITAL_REGION: &str = "none";
pub const FALLBACK_DELIVERABLE: &str = "transfer";
pub const FALLBACK_VISIBILITY: &str = "public";
pub const SUBMISSION_STATUS: &str = "draft";

pub fn fallback_tags() -> Vec<String> {
    vec!["id:bundle".to_string(), "type:custom".to_string()]
}
