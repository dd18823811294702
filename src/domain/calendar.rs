/// Calendar-day helpers shared by the whole engine
///
/// Every date the engine touches is a [`Day`]: a calendar date with no
/// time-of-day. Timestamps are turned into days in exactly one place,
/// [`Calendar::normalize_day`], so local and UTC truncation never mix.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc, Weekday};
use crate::domain::DomainError;

/// A calendar day. Compared by year/month/day only.
pub type Day = NaiveDate;

/// Canonical, sortable day key format (`YYYY-MM-DD`)
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// The single timezone reference used to decide where one day ends
/// and the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    /// Day boundaries at midnight UTC
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Day boundaries at midnight of a fixed offset east of UTC
    pub fn with_offset_minutes(minutes: i32) -> Result<Self, DomainError> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                DomainError::InvalidDate(format!("UTC offset of {} minutes is out of range", minutes))
            })?;
        Ok(Self { offset })
    }

    /// Offset east of UTC in minutes
    pub fn offset_minutes(&self) -> i32 {
        self.offset.local_minus_utc() / 60
    }

    /// Truncate a timestamp to the calendar day it falls on
    pub fn normalize_day(&self, timestamp: DateTime<Utc>) -> Day {
        timestamp.with_timezone(&self.offset).date_naive()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

/// Canonical string key for a day, used for lookups and storage
pub fn day_key(day: Day) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key back into a day
pub fn parse_day_key(key: &str) -> Result<Day, DomainError> {
    NaiveDate::parse_from_str(key.trim(), DAY_KEY_FORMAT)
        .map_err(|_| DomainError::InvalidDate(format!("Expected YYYY-MM-DD, got '{}'", key)))
}

/// Signed number of whole days `a - b`.
///
/// Works on dates, not timestamps, so there is no daylight-saving drift.
pub fn days_between(a: Day, b: Day) -> i64 {
    a.signed_duration_since(b).num_days()
}

/// Move a day by `days` (negative goes back), saturating at the ends of
/// the representable range.
pub fn shift_days(day: Day, days: i64) -> Day {
    Duration::try_days(days)
        .and_then(|delta| day.checked_add_signed(delta))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Days in `[start, end_exclusive)`, ascending
pub fn iterate_days(start: Day, end_exclusive: Day) -> DayRange {
    DayRange::new(start, end_exclusive)
}

/// First day of the week containing `day`, for weeks beginning on `first`
pub fn start_of_week(day: Day, first: Weekday) -> Day {
    let back = (7 + day.weekday().num_days_from_monday() - first.num_days_from_monday()) % 7;
    shift_days(day, -(back as i64))
}

/// A half-open range of days.
///
/// The range is a plain value; every call to [`DayRange::iter`] (or every
/// `for` loop over a copy of it) starts again from the first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    start: Day,
    end: Day,
}

impl DayRange {
    pub fn new(start: Day, end_exclusive: Day) -> Self {
        Self { start, end: end_exclusive }
    }

    pub fn start(&self) -> Day {
        self.start
    }

    pub fn end_exclusive(&self) -> Day {
        self.end
    }

    pub fn len(&self) -> usize {
        days_between(self.end, self.start).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, day: Day) -> bool {
        self.start <= day && day < self.end
    }

    pub fn iter(&self) -> DayIter {
        DayIter { next: self.start, end: self.end }
    }
}

impl IntoIterator for DayRange {
    type Item = Day;
    type IntoIter = DayIter;

    fn into_iter(self) -> DayIter {
        self.iter()
    }
}

/// Iterator over a [`DayRange`]
#[derive(Debug, Clone)]
pub struct DayIter {
    next: Day,
    end: Day,
}

impl Iterator for DayIter {
    type Item = Day;

    fn next(&mut self) -> Option<Day> {
        if self.next >= self.end {
            return None;
        }
        let day = self.next;
        // day < end, so a successor always exists
        self.next = day.succ_opt().unwrap_or(self.end);
        Some(day)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = days_between(self.end, self.next).max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DayIter {}
