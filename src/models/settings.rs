use serde::{Deserialize, Serialize};

use crate::config;

/// Credentials for the remote listing API, stored per account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

/// Per-account settings stored in the user document.
///
/// Field names follow the persisted document layout, which mixes camelCase
/// and snake_case historically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSettings {
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    #[serde(rename = "apiSecret", default)]
    pub api_secret: String,
    /// Seconds to wait between listing submissions.
    #[serde(rename = "timeBetweenListings", default = "default_time_between")]
    pub time_between_listings: u64,
    /// Age threshold in hours for the bulk-delete flow.
    #[serde(rename = "deleteListingsHours", default = "default_delete_hours")]
    pub delete_listings_hours: u32,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            time_between_listings: default_time_between(),
            delete_listings_hours: default_delete_hours(),
        }
    }
}

impl AccountSettings {
    pub fn credentials(&self) -> ApiCredentials {
        ApiCredentials {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
        }
    }
}

fn default_time_between() -> u64 {
    config::DEFAULT_RATE_LIMIT.as_secs()
}

fn default_delete_hours() -> u32 {
    config::DEFAULT_DELETE_HOURS
}
