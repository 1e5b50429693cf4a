//! The listing posting orchestrator.
//!
//! Deliberately sequential: listings are processed strictly in selection
//! order with a cooperative wait between submissions, so the rate limit is
//! meaningful and a listing-limit rejection can stop the remainder of the
//! batch deterministically.

use std::time::Duration;

use log::{info, warn};
use tokio::time::sleep;

use crate::api::{CustomPostOutcome, MarketApi};
use crate::config;
use crate::error::{RelistError, Result};
use crate::images::ImageChecker;
use crate::models::listing::{Listing, SubmissionPayload};
use crate::models::settings::ApiCredentials;
use crate::models::task::{BatchReport, PostTask, TaskState};

/// Failure classification inside one batch run.
enum PostFailure {
    /// Listing-limit rejection: hard batch-abort condition.
    Limit(String),
    /// Failure scoped to one listing; the batch continues.
    Listing(String),
}

impl From<RelistError> for PostFailure {
    fn from(err: RelistError) -> Self {
        match err {
            RelistError::ListingLimit(detail) => PostFailure::Limit(detail),
            other => PostFailure::Listing(other.to_string()),
        }
    }
}

/// Drives selected listings through the remote submission endpoint.
pub struct PostRunner<'a, A: MarketApi, C: ImageChecker> {
    api: &'a A,
    images: &'a C,
    creds: &'a ApiCredentials,
}

impl<'a, A: MarketApi, C: ImageChecker> PostRunner<'a, A, C> {
    pub fn new(api: &'a A, images: &'a C, creds: &'a ApiCredentials) -> Self {
        Self { api, images, creds }
    }

    /// Post a batch of listings in order, one at a time.
    ///
    /// Per-listing failures are recorded in the report and never raise; only
    /// batch-level setup problems (an empty batch) return `Err`. `rate_limit`
    /// falls back to a safe minimum when the caller omits it, and no wait is
    /// inserted after the final listing.
    pub async fn post_batch(
        &self,
        listings: &[Listing],
        rate_limit: Option<Duration>,
    ) -> Result<BatchReport> {
        if listings.is_empty() {
            return Err(RelistError::Validation(
                "no listing data available for posting".into(),
            ));
        }
        let wait = rate_limit.unwrap_or(config::DEFAULT_RATE_LIMIT);

        let mut tasks = Vec::with_capacity(listings.len());
        let mut aborted = false;
        for (idx, listing) in listings.iter().enumerate() {
            let mut task = PostTask::pending(listing);
            match self.run_one(listing, wait.as_secs(), &mut task).await {
                Ok(task_id) => {
                    info!("posted listing {} as task {task_id}", listing.name);
                    task.succeed(task_id);
                }
                Err(PostFailure::Listing(reason)) => {
                    warn!("listing {} failed: {reason}", listing.name);
                    task.fail(reason);
                }
                Err(PostFailure::Limit(detail)) => {
                    warn!("listing limit reached, aborting remainder of batch: {detail}");
                    task.fail(detail);
                    tasks.push(task);
                    aborted = true;
                    break;
                }
            }
            tasks.push(task);
            if idx + 1 < listings.len() && !wait.is_zero() {
                sleep(wait).await;
            }
        }

        let report = BatchReport { tasks, aborted };
        info!("{}", report.summary());
        Ok(report)
    }

    /// One listing: verify images, build the defaulted payload, submit.
    async fn run_one(
        &self,
        listing: &Listing,
        rate_limit_secs: u64,
        task: &mut PostTask,
    ) -> std::result::Result<String, PostFailure> {
        task.state = TaskState::Verifying;
        if listing.price.unwrap_or(0) <= 0 {
            return Err(PostFailure::Listing(format!(
                "listing {} has no price set",
                listing.name
            )));
        }
        self.verify_images(listing).await.map_err(PostFailure::from)?;

        task.state = TaskState::Submitting;
        let payload = SubmissionPayload::from_listing(listing, self.creds, rate_limit_secs);
        let outcome = self
            .api
            .post_listing(&payload, false)
            .await
            .map_err(PostFailure::from)?;
        outcome.task_id.ok_or_else(|| {
            PostFailure::Listing(format!("Failed posting for listing: {}", listing.name))
        })
    }

    /// Accessibility check for the cover photo and every additional image.
    /// The first unreachable URL fails the owning listing.
    async fn verify_images(&self, listing: &Listing) -> Result<()> {
        if let Some(main) = listing.primary_image_url() {
            if !self.images.verify(main).await {
                return Err(RelistError::ImageUnreachable(format!(
                    "Main image URL is not accessible: {main}"
                )));
            }
        }
        for url in listing.additional_image_urls() {
            if !self.images.verify(url).await {
                return Err(RelistError::ImageUnreachable(format!(
                    "Additional image URL is not accessible: {url}"
                )));
            }
        }
        Ok(())
    }

    /// Halt every in-flight submission for the account.
    ///
    /// A single control request flagged as a global stop; task state is not
    /// reliably retained across sessions, so the remote side decides what is
    /// in flight. Returns the number of tasks it stopped.
    pub async fn stop_all(&self) -> Result<usize> {
        let payload = SubmissionPayload::stop_marker(self.creds);
        let outcome = self.api.post_listing(&payload, true).await?;
        info!("stopped {} posting tasks", outcome.stopped_tasks.len());
        Ok(outcome.stopped_tasks.len())
    }

    /// Create a single custom listing and return its id and public URL.
    ///
    /// Same image verification as the batch path, but failures raise to the
    /// caller since there is no batch to aggregate into.
    pub async fn post_custom(&self, listing: &Listing) -> Result<CustomPostOutcome> {
        if listing.price.unwrap_or(0) <= 0 {
            return Err(RelistError::Validation(format!(
                "listing {} has no price set",
                listing.name
            )));
        }
        self.verify_images(listing).await?;
        let payload = SubmissionPayload::from_listing(listing, self.creds, 0);
        let outcome = self.api.post_custom_listing(&payload).await?;
        info!(
            "created custom listing {} at {}",
            outcome.listing_id, outcome.listing_url
        );
        Ok(outcome)
    }
}
