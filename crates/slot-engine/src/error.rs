//! Error types for slot-engine operations.
//!
//! Only environment-level problems surface here. Missing or malformed schedule
//! data degrades to "not available" and never becomes an error.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid wall-clock time: {0}")]
    InvalidTime(String),

    /// Raised by commit-time re-validation when the live booking set now
    /// blocks a slot that was free when it was offered.
    #[error("Slot starting {start} is no longer available ({conflicts} conflicting booking(s))")]
    SlotNoLongerAvailable {
        start: DateTime<Utc>,
        conflicts: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
