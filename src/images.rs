//! Image accessibility checks and the opaque image-host upload.

use std::time::Duration;

use log::warn;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use crate::error::{RelistError, Result};

// ---------------------------------------------------------------------------
// ImageChecker
// ---------------------------------------------------------------------------

/// Advisory pre-submission check that an image URL resolves.
///
/// A `false` result blocks submission of the owning listing but triggers no
/// retry; the check never errors.
#[async_trait::async_trait]
pub trait ImageChecker: Send + Sync {
    async fn verify(&self, url: &str) -> bool;
}

/// [`ImageChecker`] backed by a plain GET. An empty URL is rejected without
/// any network call; transport failure counts as inaccessible.
#[derive(Debug)]
pub struct HttpImageChecker {
    client: Client,
}

impl HttpImageChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ImageChecker for HttpImageChecker {
    async fn verify(&self, url: &str) -> bool {
        if url.trim().is_empty() {
            return false;
        }
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                warn!("image check failed for {url}: {err}");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ImageUploader
// ---------------------------------------------------------------------------

/// Signed upload to the external image host: multipart form data with the
/// file and an upload-preset identifier, returning the hosted secure URL.
/// The host itself is an opaque service.
#[derive(Debug)]
pub struct ImageUploader {
    client: Client,
    endpoint: String,
    upload_preset: String,
}

impl ImageUploader {
    pub fn new(
        endpoint: impl Into<String>,
        upload_preset: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            upload_preset: upload_preset.into(),
        })
    }

    /// Upload raw file bytes; returns the hosted URL for use as a listing
    /// photo.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("upload_preset", self.upload_preset.clone());
        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = resp.json().await?;
        body.get("secure_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RelistError::Remote("image host returned no secure_url".into()))
    }
}
