//! Explicit state machine for the posting flow.
//!
//! The UI queries this state instead of inferring it from incidental
//! re-renders or callback timing.

use crate::error::{RelistError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Importing,
    Posting,
    Stopping,
}

impl FlowState {
    /// Transition table: imports and posts start from `Idle`; a running post
    /// can finish (`Posting -> Idle`) or be stopped (`Posting -> Stopping ->
    /// Idle`). Everything else is illegal.
    pub fn can_transition(self, next: FlowState) -> bool {
        use FlowState::*;
        matches!(
            (self, next),
            (Idle, Importing)
                | (Importing, Idle)
                | (Idle, Posting)
                | (Posting, Idle)
                | (Posting, Stopping)
                | (Stopping, Idle)
        )
    }
}

/// Session-owned tracker enforcing the [`FlowState`] transition table.
#[derive(Debug, Default)]
pub struct FlowTracker {
    state: FlowState,
}

impl Default for FlowState {
    fn default() -> Self {
        FlowState::Idle
    }
}

impl FlowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Move to `next`, rejecting transitions outside the table.
    pub fn transition(&mut self, next: FlowState) -> Result<()> {
        if !self.state.can_transition(next) {
            return Err(RelistError::Validation(format!(
                "illegal flow transition: {:?} -> {:?}",
                self.state, next
            )));
        }
        self.state = next;
        Ok(())
    }
}
