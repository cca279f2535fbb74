mod bucket;
mod month;

pub use bucket::{DayBucket, WeekBucket};
pub use month::{MonthKey, month_options};

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate};

use super::reading::Reading;
use super::time;

/// Rolling seven-day view: one bucket per calendar day, plus the day
/// with the largest energy total.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReport {
    pub days: Vec<DayBucket>,
    pub most_wasteful: Option<DayBucket>,
}

/// Fixed calendar-month view grouped by week-of-month index.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyReport {
    pub weeks: Vec<WeekBucket>,
    pub most_wasteful: Option<WeekBucket>,
}

/// Folds readings of the last 6 calendar days plus today into day
/// buckets. The window deliberately ignores month boundaries; the
/// monthly view below is the strictly calendar-scoped one.
///
/// `None` when no reading falls into the window — callers render that
/// as "no data", never as zero.
pub fn compute_weekly(readings: &[Reading], now: DateTime<Local>) -> Option<WeeklyReport> {
    let from = time::start_of_day(now - chrono::Duration::days(6));

    let mut in_window: Vec<&Reading> = readings
        .iter()
        .filter(|r| r.timestamp.is_some_and(|ts| ts >= from))
        .collect();
    in_window.sort_by_key(|r| r.timestamp);

    if in_window.is_empty() {
        return None;
    }

    let days = fold_day_buckets(&in_window);
    let days: Vec<DayBucket> = days.into_values().collect();
    let most_wasteful = most_wasteful_day(&days);

    Some(WeeklyReport { days, most_wasteful })
}

/// Folds the readings of one calendar month into week-of-month
/// buckets: energy and cost are sums of the per-day maxima, the peak is
/// the maximum over the week's raw readings.
pub fn compute_monthly(readings: &[Reading], month: MonthKey) -> Option<MonthlyReport> {
    let mut in_month: Vec<&Reading> = readings
        .iter()
        .filter(|r| r.timestamp.is_some_and(|ts| MonthKey::of(ts) == month))
        .collect();
    in_month.sort_by_key(|r| r.timestamp);

    if in_month.is_empty() {
        return None;
    }

    let days = fold_day_buckets(&in_month);

    let mut weeks: BTreeMap<u32, WeekBucket> = BTreeMap::new();
    for day in days.values() {
        let index = time::week_of_month(day.date);
        weeks.entry(index).or_insert_with(|| WeekBucket::new(index)).add_day(day);
    }

    //peaks come from the raw readings, in timestamp order so the first maximum wins
    for reading in &in_month {
        let Some(ts) = reading.timestamp else { continue };
        let index = time::week_of_month(ts.date_naive());
        weeks
            .entry(index)
            .or_insert_with(|| WeekBucket::new(index))
            .absorb_peak(reading);
    }

    let weeks: Vec<WeekBucket> = weeks.into_values().collect();
    let most_wasteful = most_wasteful_week(&weeks);

    Some(MonthlyReport { weeks, most_wasteful })
}

/// Final `n` entries in store order, for the short-horizon power
/// profile. Shorter when the store holds fewer.
pub fn last_n_samples(readings: &[Reading], n: usize) -> &[Reading] {
    &readings[readings.len().saturating_sub(n)..]
}

fn fold_day_buckets(readings: &[&Reading]) -> BTreeMap<NaiveDate, DayBucket> {
    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for reading in readings {
        let Some(ts) = reading.timestamp else { continue };
        let date = ts.date_naive();
        days.entry(date).or_insert_with(|| DayBucket::new(date)).absorb(reading);
    }

    days
}

fn most_wasteful_day(days: &[DayBucket]) -> Option<DayBucket> {
    let mut best: Option<&DayBucket> = None;

    for day in days {
        let Some(energy) = day.energy else { continue };
        match best {
            //earliest date wins ties
            Some(current) if current.energy.is_some_and(|cur| cur >= energy) => {}
            _ => best = Some(day),
        }
    }

    best.cloned()
}

fn most_wasteful_week(weeks: &[WeekBucket]) -> Option<WeekBucket> {
    let mut best: Option<&WeekBucket> = None;

    for week in weeks {
        let Some(energy) = week.energy else { continue };
        match best {
            Some(current) if current.energy.is_some_and(|cur| cur >= energy) => {}
            _ => best = Some(week),
        }
    }

    best.cloned()
}
