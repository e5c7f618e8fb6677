//! Date-range resolution for time-scoped aggregations
//!
//! A coarse period token (`daily`, `weekly`, `monthly`) resolves to a
//! half-open window `[start, end)` ending now. Calendar boundaries are taken in
//! the caller's time zone (the server's local zone in production) and the
//! resulting instants are stored in UTC.
//!
//! Every endpoint uses the same definition:
//! - `daily`   → local midnight today
//! - `weekly`  → local midnight six days ago (seven calendar days inclusive)
//! - `monthly` → local midnight on the first day of the current month
//! - anything else → a trailing 30-day window

use chrono::{DateTime, Datelike, Days, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::{CoreError, Result};

/// Trailing window length used when no period is given
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Period selection for windowed aggregations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "daily" => Some(Period::Daily),
            "weekly" => Some(Period::Weekly),
            "monthly" => Some(Period::Monthly),
            _ => None,
        }
    }

    /// Parse a token, rejecting anything outside `daily|weekly|monthly`
    pub fn parse_strict(token: Option<&str>) -> Result<Self> {
        token
            .and_then(Self::from_token)
            .ok_or_else(|| CoreError::InvalidPeriod {
                given: token.unwrap_or_default().to_string(),
            })
    }

    /// Parse a token, mapping unknown or absent values to `None`
    /// (the trailing 30-day default)
    pub fn parse_lenient(token: Option<&str>) -> Option<Self> {
        token.and_then(Self::from_token)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open time interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Resolve a period against the current local time
    pub fn resolve(period: Option<Period>) -> Self {
        Self::resolve_at(period, Local::now())
    }

    /// Resolve a period against an explicit "now"
    ///
    /// Calendar boundaries (midnight, first of month) are computed in `now`'s
    /// time zone.
    pub fn resolve_at<Tz: TimeZone>(period: Option<Period>, now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let end = now.with_timezone(&Utc);

        let start = match period {
            Some(Period::Daily) => midnight(&tz, today),
            Some(Period::Weekly) => {
                let first = today.checked_sub_days(Days::new(6)).unwrap_or(today);
                midnight(&tz, first)
            }
            Some(Period::Monthly) => midnight(&tz, today.with_day(1).unwrap_or(today)),
            None => end - Duration::days(DEFAULT_WINDOW_DAYS),
        };

        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The equal-length window immediately before this one
    pub fn previous(&self) -> Self {
        let length = self.duration();
        Self {
            start: self.start - length,
            end: self.start,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Midnight at the start of `date` in `tz`, as a UTC instant
///
/// When midnight does not exist locally (DST gap) the date is read as UTC.
fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}
