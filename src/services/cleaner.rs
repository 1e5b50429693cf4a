//! Bulk removal of stale posted listings.

use log::info;

use crate::api::{MarketApi, PurgeReport};
use crate::error::{RelistError, Result};
use crate::models::settings::ApiCredentials;

/// Drafts and deletes listings older than a caller-chosen threshold.
pub struct Cleaner<'a, A: MarketApi> {
    api: &'a A,
    creds: &'a ApiCredentials,
}

impl<'a, A: MarketApi> Cleaner<'a, A> {
    pub fn new(api: &'a A, creds: &'a ApiCredentials) -> Self {
        Self { api, creds }
    }

    /// Delete every posted listing older than `hours`.
    ///
    /// The remote side drafts each candidate first and then deletes it, so a
    /// listing that fails mid-way surfaces in the failed counters rather than
    /// aborting the sweep.
    pub async fn delete_older_than(&self, hours: u32) -> Result<PurgeReport> {
        if hours == 0 {
            return Err(RelistError::Validation(
                "delete threshold must be at least one hour".into(),
            ));
        }
        let report = self.api.delete_old_listings(hours, self.creds).await?;
        info!(
            "purged listings older than {hours}h: {} drafted, {} deleted, {} failed",
            report.drafted,
            report.deleted,
            report.failed_draft + report.failed_delete
        );
        Ok(report)
    }
}
