use serde::{Deserialize, Serialize};

use crate::models::listing::Listing;

// ---------------------------------------------------------------------------
// PostTask — one submission attempt for one listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Pending,
    Verifying,
    Submitting,
    Succeeded,
    Failed,
}

/// One in-flight or completed submission attempt for one listing.
///
/// `task_id` is assigned by the remote API and exists only once the task has
/// reached `Submitting` or a terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTask {
    pub listing_id: String,
    pub listing_name: String,
    pub state: TaskState,
    pub task_id: Option<String>,
    pub error: Option<String>,
}

impl PostTask {
    pub fn pending(listing: &Listing) -> Self {
        Self {
            listing_id: listing.id.clone(),
            listing_name: listing.name.clone(),
            state: TaskState::Pending,
            task_id: None,
            error: None,
        }
    }

    pub fn succeed(&mut self, task_id: String) {
        self.state = TaskState::Succeeded;
        self.task_id = Some(task_id);
        self.error = None;
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = TaskState::Failed;
        self.error = Some(reason.into());
    }
}

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// Ordered per-listing outcomes of one `post_batch` call.
///
/// When the remote API reports a listing-limit rejection mid-batch, `aborted`
/// is set and outcomes exist only for the listings processed up to and
/// including the rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub tasks: Vec<PostTask>,
    pub aborted: bool,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    pub fn succeeded(&self) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.state == TaskState::Succeeded)
            .count()
    }

    /// Aggregate summary surfaced to the caller, e.g. `"2 of 3 listings posted"`.
    pub fn summary(&self) -> String {
        format!("{} of {} listings posted", self.succeeded(), self.total())
    }
}
