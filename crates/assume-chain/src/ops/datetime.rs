//! Checks available on `Chain<Date>`.

use chrono::{DateTime, Datelike, Utc, Weekday};

use super::{ensure, instant};
use crate::chain::Chain;
use crate::tag::Date;

impl Chain<Date> {
    /// Strictly earlier than `bound`.
    pub fn before(self, bound: DateTime<Utc>) -> Self {
        self.queue("before", move |v| {
            let at = instant(v)?;
            ensure(*at < bound, || format!("Expected date before {bound}, got {at}"))
        })
    }

    /// Strictly later than `bound`.
    pub fn after(self, bound: DateTime<Utc>) -> Self {
        self.queue("after", move |v| {
            let at = instant(v)?;
            ensure(*at > bound, || format!("Expected date after {bound}, got {at}"))
        })
    }

    /// Inclusive range.
    pub fn between(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.queue("between", move |v| {
            let at = instant(v)?;
            ensure(*at >= start && *at <= end, || {
                format!("Expected date between {start} and {end}, got {at}")
            })
        })
    }

    /// Earlier than the moment the check runs.
    pub fn in_past(self) -> Self {
        self.queue("in_past", |v| {
            let at = instant(v)?;
            ensure(*at < Utc::now(), || format!("Expected date in the past, got {at}"))
        })
    }

    /// Later than the moment the check runs.
    pub fn in_future(self) -> Self {
        self.queue("in_future", |v| {
            let at = instant(v)?;
            ensure(*at > Utc::now(), || format!("Expected date in the future, got {at}"))
        })
    }

    /// Falls on `day` (UTC).
    pub fn weekday(self, day: Weekday) -> Self {
        self.queue("weekday", move |v| {
            let actual = instant(v)?.weekday();
            ensure(actual == day, || format!("Expected {day}, got {actual}"))
        })
    }
}
