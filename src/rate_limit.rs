//! GitHub API quota guard.
//!
//! Checking the quota is free: `GET /rate_limit` does not count against it.
//! The guard fails only when the quota is fully spent; a low quota is
//! reported in the log and work continues. There is no waiting for the reset.

use crate::error::{Error, Result, RESET_FORMAT};
use crate::session::Session;
use chrono::{DateTime, Utc};
use log::{info, warn};

/// Below this many remaining calls the guard logs a warning.
pub const LOW_QUOTA_THRESHOLD: u32 = 10;

/// One snapshot of the core REST quota. Never cached between checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub remaining: u32,
    pub limit: u32,
    pub reset: DateTime<Utc>,
}

impl Quota {
    /// Build from the raw integers GitHub reports, with `reset` in Unix
    /// epoch seconds. `remaining` is clamped into `0..=limit`.
    pub fn from_raw(remaining: i64, limit: i64, reset: i64) -> Option<Self> {
        let limit = u32::try_from(limit).ok()?;
        let remaining = u32::try_from(remaining.max(0)).ok()?.min(limit);
        let reset = DateTime::<Utc>::from_timestamp(reset, 0)?;
        Some(Self {
            remaining,
            limit,
            reset,
        })
    }

    fn reset_display(&self) -> impl std::fmt::Display + '_ {
        self.reset.format(RESET_FORMAT)
    }
}

/// Outcome of a check that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaLevel {
    /// Fewer than [`LOW_QUOTA_THRESHOLD`] calls left.
    Low,
    Healthy,
}

/// Apply the guard policy to a snapshot.
pub fn evaluate(quota: &Quota) -> Result<QuotaLevel> {
    if quota.remaining == 0 {
        return Err(Error::QuotaExhausted {
            remaining: quota.remaining,
            limit: quota.limit,
            reset: quota.reset,
        });
    }
    // Separate from the exhaustion check above, which always runs first.
    if quota.remaining < LOW_QUOTA_THRESHOLD {
        warn!(
            "approaching GitHub API limit, {} / {} remaining until {} UTC.",
            quota.remaining,
            quota.limit,
            quota.reset_display()
        );
        Ok(QuotaLevel::Low)
    } else {
        info!(
            "GitHub API limit: {} / {} remaining until {} UTC.",
            quota.remaining,
            quota.limit,
            quota.reset_display()
        );
        Ok(QuotaLevel::Healthy)
    }
}

/// Fetch the current quota for `session` and apply [`evaluate`].
pub async fn check_quota(session: &Session) -> Result<QuotaLevel> {
    let quota = session.rate_limit().await?;
    evaluate(&quota)
}
