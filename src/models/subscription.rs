use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RelistError, Result};

// ---------------------------------------------------------------------------
// SubscriptionRecord — the account-level gate on posting features
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Expired,
}

/// One subscription record per account, defined by an expiry timestamp and a
/// derived status.
///
/// The status invariant (`Expired` iff `now >= expires_at`) is enforced by the
/// monitor, not the datastore; staleness up to one tick is expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub subscription_key: String,
    pub expires_at: DateTime<Utc>,
    pub status: SubscriptionStatus,
}

impl SubscriptionRecord {
    /// The record used when an account has no subscription at all: an empty
    /// key with an already-expired sentinel timestamp, so the account is
    /// gated to no-subscription behavior.
    pub fn sentinel() -> Self {
        Self {
            subscription_key: String::new(),
            expires_at: DateTime::<Utc>::UNIX_EPOCH,
            status: SubscriptionStatus::Expired,
        }
    }

    /// Status derived purely from the expiry timestamp.
    pub fn derived_status(&self, now: DateTime<Utc>) -> SubscriptionStatus {
        if self.expires_at <= now {
            SubscriptionStatus::Expired
        } else {
            SubscriptionStatus::Active
        }
    }
}

/// Result of redeeming a subscription code with the remote API.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub subscription_key: String,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Remaining — human-readable countdown decomposition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    /// Decompose a positive time delta into days/hours/minutes/seconds.
    pub fn decompose(diff: TimeDelta) -> Self {
        Self {
            days: diff.num_days(),
            hours: diff.num_hours() % 24,
            minutes: diff.num_minutes() % 60,
            seconds: diff.num_seconds() % 60,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Parse an expiry timestamp from the remote API.
///
/// The server emits naive ISO-8601 without a zone offset
/// (`2025-01-01T00:00:00.815529`); RFC 3339 is accepted as well and naive
/// values are taken as UTC.
pub fn parse_expires_at(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| RelistError::Validation(format!("invalid expiry timestamp {raw:?}: {e}")))
}
