//! Per-forum grouping and daily-mean resampling of scored posts.

use crate::date::{iter_days, Day};
use std::collections::BTreeMap;
use time::PrimitiveDateTime;

/// One scored post: creation time (may be missing) and compound score.
pub type ScorePoint = (Option<PrimitiveDateTime>, f64);

/// Daily means over a contiguous run of days. Days without posts hold `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DailySeries {
    pub days: Vec<(Day, Option<f64>)>,
}

impl DailySeries {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_day(&self) -> Option<Day> {
        self.days.first().map(|(d, _)| *d)
    }

    pub fn last_day(&self) -> Option<Day> {
        self.days.last().map(|(d, _)| *d)
    }

    /// Maximal runs of consecutive days that have a value, for drawing line segments.
    pub fn segments(&self) -> Vec<Vec<(i32, f64)>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        for (day, value) in &self.days {
            match value {
                Some(v) => current.push((day.julian(), *v)),
                None if !current.is_empty() => out.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }
}

/// Mean score per UTC day from the first to the last dated point. Undated points are dropped.
pub fn resample_daily_mean(points: &[ScorePoint]) -> DailySeries {
    let mut sums: BTreeMap<Day, (f64, u32)> = BTreeMap::new();
    for (ts, score) in points {
        if let Some(ts) = ts {
            let e = sums.entry(Day::of(*ts)).or_insert((0.0, 0));
            e.0 += score;
            e.1 += 1;
        }
    }
    let (Some(&first), Some(&last)) = (sums.keys().next(), sums.keys().next_back()) else {
        return DailySeries::default();
    };
    let days = iter_days(first, last)
        .map(|d| (d, sums.get(&d).map(|(sum, n)| sum / f64::from(*n))))
        .collect();
    DailySeries { days }
}

/// Group `(forum, created_utc, score)` rows by forum. Rows without a forum name are dropped.
pub fn group_by_forum<I>(rows: I) -> BTreeMap<String, Vec<ScorePoint>>
where
    I: IntoIterator<Item = (Option<String>, Option<PrimitiveDateTime>, f64)>,
{
    let mut out: BTreeMap<String, Vec<ScorePoint>> = BTreeMap::new();
    for (forum, ts, score) in rows {
        if let Some(forum) = forum {
            out.entry(forum).or_default().push((ts, score));
        }
    }
    out
}
