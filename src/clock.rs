/// Source of "now" for the service layer
///
/// The engine never reads the clock. The tracker asks a `Clock` once per
/// operation and hands the resulting day down.

use std::cell::Cell;
use chrono::{DateTime, NaiveTime, Utc};
use crate::domain::{shift_days, Day};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Used by tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Noon UTC on `day`, far enough from midnight for any small offset
    pub fn at_day(day: Day) -> Self {
        Self::new(Self::noon(day))
    }

    pub fn set_day(&self, day: Day) {
        self.now.set(Self::noon(day));
    }

    pub fn advance_days(&self, days: i64) {
        let today = self.now.get().date_naive();
        self.set_day(shift_days(today, days));
    }

    fn noon(day: Day) -> DateTime<Utc> {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        day.and_time(noon).and_utc()
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
