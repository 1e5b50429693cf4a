//! Listing import and collection maintenance.
//!
//! The collection document is read-merge-written as a whole; concurrent
//! writers race last-writer-wins.

use log::{info, warn};
use url::Url;

use crate::api::MarketApi;
use crate::error::{RelistError, Result};
use crate::models::listing::Listing;
use crate::models::settings::ApiCredentials;
use crate::services::merge::merge;
use crate::store::DocumentStore;

/// Imports candidate listings from marketplace URLs and maintains the
/// account's persisted collection.
pub struct Importer<'a, A: MarketApi, S: DocumentStore> {
    api: &'a A,
    store: &'a S,
    account: &'a str,
    creds: &'a ApiCredentials,
}

impl<'a, A: MarketApi, S: DocumentStore> Importer<'a, A, S> {
    pub fn new(api: &'a A, store: &'a S, account: &'a str, creds: &'a ApiCredentials) -> Self {
        Self {
            api,
            store,
            account,
            creds,
        }
    }

    /// Import listings from the given URLs and merge them into the persisted
    /// collection.
    ///
    /// Blank and unparseable entries are skipped up front; an empty batch
    /// after filtering is a no-op with no network call. Returns the newly
    /// imported listings (the remote side omits URLs it cannot resolve).
    pub async fn import(&self, urls: &[String]) -> Result<Vec<Listing>> {
        let cleaned: Vec<String> = urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .filter(|u| match Url::parse(u) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => true,
                _ => {
                    warn!("skipping unparseable listing URL: {u}");
                    false
                }
            })
            .map(str::to_string)
            .collect();
        if cleaned.is_empty() {
            return Ok(Vec::new());
        }

        let imported = self.api.import_listings(&cleaned, self.creds).await?;
        info!(
            "imported {} of {} listings for account {}",
            imported.len(),
            cleaned.len(),
            self.account
        );

        let existing = self.store.load_listings(self.account).await?;
        let merged = merge(existing, Some(imported.clone()));
        self.store.save_listings(self.account, merged).await?;
        Ok(imported)
    }

    /// The persisted collection, empty when nothing was ever imported.
    pub async fn saved(&self) -> Result<Vec<Listing>> {
        Ok(self
            .store
            .load_listings(self.account)
            .await?
            .unwrap_or_default())
    }

    /// Replace the stored copy of one listing, matched by id.
    ///
    /// A collection document that was never created aborts with a
    /// missing-document error instructing a refresh; there is no silent
    /// recovery.
    pub async fn update_listing(&self, updated: Listing) -> Result<()> {
        let listings = self.store.load_listings(self.account).await?.ok_or_else(|| {
            RelistError::MissingDocument(
                "the listings data is missing; refresh and try again".into(),
            )
        })?;

        let mut found = false;
        let next: Vec<Listing> = listings
            .into_iter()
            .map(|l| {
                if l.id == updated.id {
                    found = true;
                    updated.clone()
                } else {
                    l
                }
            })
            .collect();
        if !found {
            return Err(RelistError::Validation(format!(
                "no listing with id {}",
                updated.id
            )));
        }
        self.store.save_listings(self.account, next).await
    }

    /// Update only the price of one listing, in minor currency units.
    pub async fn update_price(&self, listing_id: &str, price: i64) -> Result<()> {
        let listings = self.store.load_listings(self.account).await?.ok_or_else(|| {
            RelistError::MissingDocument("the price data is missing; refresh and try again".into())
        })?;

        let mut found = false;
        let next: Vec<Listing> = listings
            .into_iter()
            .map(|mut l| {
                if l.id == listing_id {
                    found = true;
                    l.price = Some(price);
                }
                l
            })
            .collect();
        if !found {
            return Err(RelistError::Validation(format!(
                "no listing with id {listing_id}"
            )));
        }
        self.store.save_listings(self.account, next).await
    }
}
