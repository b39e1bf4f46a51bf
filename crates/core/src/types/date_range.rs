//! Symbolic date ranges for analytics queries.
//!
//! A range token names the lower bound of a query window; the upper bound is
//! always "now". Resolution is a pure function of the token and an explicit
//! `now`, so the caller picks both the clock and the reporting timezone:
//!
//! ```rust
//! use chrono::{FixedOffset, TimeZone};
//! use tally_core::{RangeToken, resolve_range_start};
//!
//! let tz = FixedOffset::east_opt(9 * 3600).expect("valid offset");
//! let now = tz.with_ymd_and_hms(2026, 3, 14, 15, 30, 0).unwrap();
//!
//! let start = resolve_range_start(RangeToken::parse("today"), &now);
//! assert_eq!(start.to_rfc3339(), "2026-03-13T15:00:00+00:00");
//! ```

use chrono::{DateTime, Days, NaiveTime, TimeDelta, TimeZone, Utc};

/// Lower bound of an analytics query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeToken {
    /// Since local midnight of the current day.
    Today,
    /// The last seven calendar days up to now.
    LastSevenDays,
    /// No lower bound.
    AllTime,
}

impl RangeToken {
    /// Parse a query-string token.
    ///
    /// Only `"today"` and `"7days"` are recognised; every other value,
    /// including the empty string, means all time.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "today" => Self::Today,
            "7days" => Self::LastSevenDays,
            _ => Self::AllTime,
        }
    }

    /// The canonical token text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::LastSevenDays => "7days",
            Self::AllTime => "all",
        }
    }
}

impl std::fmt::Display for RangeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a range token to the inclusive start instant of the window.
///
/// `now` carries the reporting timezone: "today" starts at midnight in that
/// zone, and "7days" steps back seven calendar days keeping the wall-clock
/// time (so a DST change inside the window does not shift the bound).
#[must_use]
pub fn resolve_range_start<Tz: TimeZone>(token: RangeToken, now: &DateTime<Tz>) -> DateTime<Utc> {
    match token {
        RangeToken::Today => {
            let midnight = now.date_naive().and_time(NaiveTime::MIN);
            now.timezone()
                .from_local_datetime(&midnight)
                .earliest()
                .map_or_else(|| Utc.from_utc_datetime(&midnight), |dt| dt.with_timezone(&Utc))
        }
        RangeToken::LastSevenDays => now
            .clone()
            .checked_sub_days(Days::new(7))
            .unwrap_or_else(|| now.clone() - TimeDelta::days(7))
            .with_timezone(&Utc),
        // `DateTime<Utc>` defaults to the Unix epoch.
        RangeToken::AllTime => DateTime::<Utc>::default(),
    }
}
