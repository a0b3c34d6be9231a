use std::fmt;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime};

/// A UTC calendar day, ordered and stepped as a Julian day number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(i32);

impl Day {
    pub fn from_date(date: Date) -> Self {
        Self(date.to_julian_day())
    }

    /// Timestamps are stored as UTC without zone, so the date part is the UTC day.
    pub fn of(ts: PrimitiveDateTime) -> Self {
        Self::from_date(ts.date())
    }

    pub fn from_julian(n: i32) -> Self {
        Self(n)
    }

    pub fn julian(self) -> i32 {
        self.0
    }

    pub fn to_date(self) -> Option<Date> {
        Date::from_julian_day(self.0).ok()
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date().and_then(|d| d.format(format_description!("[year]-[month]-[day]")).ok()) {
            Some(s) => f.write_str(&s),
            None => write!(f, "JD{}", self.0),
        }
    }
}

/// Inclusive iteration from `start` to `end` (if `start` <= `end`), else empty.
pub fn iter_days(start: Day, end: Day) -> impl Iterator<Item = Day> {
    let mut curr = if start <= end { Some(start) } else { None };
    std::iter::from_fn(move || {
        let ret = curr?;
        curr = Some(ret.next()).filter(|n| *n <= end);
        Some(ret)
    })
}
