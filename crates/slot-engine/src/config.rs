//! Tunables for slot generation.

use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;

/// Default spacing between candidate start times, in minutes.
pub const DEFAULT_GRANULARITY_MINUTES: u32 = 30;

/// Slot generation settings.
///
/// Deserializes from a partial document; omitted fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlotConfig {
    /// Candidate starts are aligned to multiples of this many minutes after midnight.
    pub granularity_minutes: u32,
    /// How starts that fall into a spring-forward gap are treated.
    pub dst_policy: DstPolicy,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            dst_policy: DstPolicy::Skip,
        }
    }
}

impl SlotConfig {
    pub fn with_granularity(mut self, minutes: u32) -> Self {
        self.granularity_minutes = minutes;
        self
    }

    pub fn with_dst_policy(mut self, policy: DstPolicy) -> Self {
        self.dst_policy = policy;
        self
    }
}
