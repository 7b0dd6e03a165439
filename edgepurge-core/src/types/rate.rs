//! Rate accounting types
//!
//! Window arithmetic lives here as pure functions so it can be tested without
//! a store or a clock.

use chrono::{DateTime, Duration, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Length of the rolling API-rate window
pub const API_RATE_WINDOW_MINUTES: i64 = 5;

/// Persisted value of one counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateCounter {
    pub count: u64,
    pub window_start: DateTime<Utc>,
}

/// How a counter's window is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateWindow {
    /// Resets once more than `length` has elapsed since the window start
    Rolling(Duration),
    /// Resets when the calendar date (in `offset`) differs from the window start's date
    CalendarDay(FixedOffset),
}

impl RateWindow {
    /// The five minute API-rate window
    #[must_use]
    pub fn api_rate() -> Self {
        Self::Rolling(Duration::minutes(API_RATE_WINDOW_MINUTES))
    }

    /// A calendar day in UTC
    #[must_use]
    pub fn utc_day() -> Self {
        Self::CalendarDay(Utc.fix())
    }

    /// Whether a window that began at `start` still covers `now`
    #[must_use]
    pub fn is_current(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Rolling(length) => now.signed_duration_since(start) <= *length,
            Self::CalendarDay(offset) => {
                start.with_timezone(offset).date_naive() == now.with_timezone(offset).date_naive()
            }
        }
    }

    /// Count visible at `now`: the stored count inside the window, otherwise zero
    #[must_use]
    pub fn current_count(&self, counter: Option<&RateCounter>, now: DateTime<Utc>) -> u64 {
        counter
            .filter(|c| self.is_current(c.window_start, now))
            .map_or(0, |c| c.count)
    }

    /// Value to persist after one increment at `now`
    ///
    /// An absent or expired counter restarts at 1 with the window starting at `now`.
    #[must_use]
    pub fn advance(&self, counter: Option<RateCounter>, now: DateTime<Utc>) -> RateCounter {
        match counter {
            Some(c) if self.is_current(c.window_start, now) => RateCounter {
                count: c.count.saturating_add(1),
                window_start: c.window_start,
            },
            _ => RateCounter {
                count: 1,
                window_start: now,
            },
        }
    }
}

/// Which counter an operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    /// Provider API calls, rolling five minutes
    ApiRate,
    /// Tag purge requests, per calendar day
    TagPurgeDaily,
}

impl CounterKind {
    /// Storage key holding the count
    #[must_use]
    pub fn count_key(self) -> &'static str {
        match self {
            Self::ApiRate => "api_rate_count",
            Self::TagPurgeDaily => "tag_purge_daily_count",
        }
    }

    /// Storage key holding the window start timestamp
    #[must_use]
    pub fn start_key(self) -> &'static str {
        match self {
            Self::ApiRate => "api_rate_count_start",
            Self::TagPurgeDaily => "tag_purge_daily_count_start",
        }
    }
}
