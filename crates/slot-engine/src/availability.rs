//! Per-date availability resolution from weekly rules and date overrides.
//!
//! An override for a date replaces the weekly rule for that date in full; its
//! window is never intersected or merged with the weekly window. Missing or
//! malformed data resolves to "not available" and is never an error.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::schedule::{
    format_wall_clock, parse_wall_clock, AvailabilityOverride, WeeklyAvailabilityRule,
};

/// Open/close wall-clock window for one date, in minutes since midnight
/// (coach timezone). `open < close` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveWindow {
    pub open: u32,
    pub close: u32,
}

impl EffectiveWindow {
    /// Build a window from raw `"HH:mm"` strings.
    ///
    /// Returns `None` if either time is malformed or `end <= start`.
    pub fn parse(start_time: &str, end_time: &str) -> Option<Self> {
        let open = parse_wall_clock(start_time)?;
        let close = parse_wall_clock(end_time)?;
        (open < close).then_some(Self { open, close })
    }

    pub fn start_time(&self) -> String {
        format_wall_clock(self.open)
    }

    pub fn end_time(&self) -> String {
        format_wall_clock(self.close)
    }

    pub fn len_minutes(&self) -> u32 {
        self.close - self.open
    }
}

/// Result of resolving one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// `None` when the coach is not available on `date`.
    pub window: Option<EffectiveWindow>,
}

impl DayAvailability {
    pub fn unavailable(date: NaiveDate) -> Self {
        Self { date, window: None }
    }

    pub fn is_available(&self) -> bool {
        self.window.is_some()
    }
}

/// Weekly rules normalized to one entry per day of week.
///
/// Duplicate rules for the same day are resolved first-match-wins; rules with a
/// day outside 0–6 are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Option<WeeklyAvailabilityRule>; 7],
}

impl WeeklySchedule {
    pub fn from_rules(rules: &[WeeklyAvailabilityRule]) -> Self {
        let mut days: [Option<WeeklyAvailabilityRule>; 7] = Default::default();

        for rule in rules {
            let Some(slot) = days.get_mut(usize::from(rule.day_of_week)) else {
                warn!(
                    day_of_week = rule.day_of_week,
                    "ignoring weekly rule with out-of-range day of week"
                );
                continue;
            };
            if slot.is_some() {
                debug!(
                    day_of_week = rule.day_of_week,
                    "duplicate weekly rule ignored, first match wins"
                );
                continue;
            }
            *slot = Some(rule.clone());
        }

        Self { days }
    }

    /// The rule consulted for `date`'s day of week (Sunday = 0).
    pub fn rule_for(&self, date: NaiveDate) -> Option<&WeeklyAvailabilityRule> {
        let index = date.weekday().num_days_from_sunday() as usize;
        self.days[index].as_ref()
    }
}

/// Resolve availability for `date` from raw weekly rules and overrides.
pub fn resolve(
    date: NaiveDate,
    weekly_rules: &[WeeklyAvailabilityRule],
    overrides: &[AvailabilityOverride],
) -> DayAvailability {
    resolve_with_schedule(date, &WeeklySchedule::from_rules(weekly_rules), overrides)
}

/// Resolve availability for `date` against an already-normalized schedule.
///
/// The first override whose date equals `date` wins outright. Otherwise the
/// weekly rule for the day of week applies.
pub fn resolve_with_schedule(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    overrides: &[AvailabilityOverride],
) -> DayAvailability {
    if let Some(ovr) = overrides.iter().find(|o| o.date == date) {
        if !ovr.is_available {
            return DayAvailability::unavailable(date);
        }
        let window = match (ovr.start_time.as_deref(), ovr.end_time.as_deref()) {
            (Some(start), Some(end)) => checked_window(date, start, end, "override"),
            _ => {
                warn!(%date, "available override without start/end time");
                None
            }
        };
        return DayAvailability { date, window };
    }

    let window = match schedule.rule_for(date).filter(|rule| rule.is_available) {
        Some(rule) => match (rule.start_time.as_deref(), rule.end_time.as_deref()) {
            (Some(start), Some(end)) => checked_window(date, start, end, "weekly rule"),
            _ => {
                warn!(%date, "available weekly rule without start/end time");
                None
            }
        },
        None => None,
    };

    DayAvailability { date, window }
}

/// Resolve every date in `from..=to`, in order.
pub fn resolve_range(
    from: NaiveDate,
    to: NaiveDate,
    schedule: &WeeklySchedule,
    overrides: &[AvailabilityOverride],
) -> Vec<DayAvailability> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|d| resolve_with_schedule(d, schedule, overrides))
        .collect()
}

fn checked_window(
    date: NaiveDate,
    start: &str,
    end: &str,
    source: &'static str,
) -> Option<EffectiveWindow> {
    let window = EffectiveWindow::parse(start, end);
    if window.is_none() {
        warn!(%date, start, end, source, "invalid availability window, treating day as unavailable");
    }
    window
}
