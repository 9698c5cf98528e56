//! DST transition policies for wall-clock times that do not exist.
//!
//! Ambiguous wall-clock times (the repeated hour when clocks fall back) always
//! resolve to the earlier instant. The policy below only governs the gap left
//! when clocks spring forward.

use serde::{Deserialize, Serialize};

/// Policy for wall-clock times that fall inside a DST gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop the time entirely (e.g., 02:30 on a spring-forward day yields nothing).
    #[default]
    Skip,
    /// Interpret the time with the offset in effect before the gap, which moves
    /// it forward by the gap length (02:30 becomes 03:30).
    ShiftForward,
    /// Interpret the time with the offset in effect after the gap. This is the
    /// earlier of the two candidate instants (02:30 reads as 01:30).
    ShiftBackward,
}
