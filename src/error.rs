#[derive(Debug, thiserror::Error)]
pub enum RelistError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A non-success response from the remote listing API, carrying the
    /// server-supplied detail verbatim.
    #[error("{0}")]
    Remote(String),

    /// The remote API refused the submission because the account's listing
    /// limit is reached. Aborts the remainder of a batch.
    #[error("{0}")]
    ListingLimit(String),

    /// A listing image URL failed the pre-submission accessibility check.
    #[error("{0}")]
    ImageUnreachable(String),

    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// An expected datastore document is absent; the caller should refresh.
    #[error("Missing document: {0}")]
    MissingDocument(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, RelistError>;
