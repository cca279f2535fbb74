use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::{DateTime, Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::core::reading::Reading;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(at: DateTime<Local>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// Persisted keys may carry anything, so validate before use.
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    pub fn label(&self) -> String {
        let name = (self.month as usize).checked_sub(1).and_then(|i| MONTH_NAMES.get(i));
        match name {
            Some(name) => format!("{} {}", name, self.year),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Distinct months present in the readings, chronologically ascending.
/// These are the selectable options for the monthly view.
pub fn month_options(readings: &[Reading]) -> Vec<MonthKey> {
    readings
        .iter()
        .filter_map(|r| r.timestamp.map(MonthKey::of))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reading::{Reading, ReadingId};
    use crate::core::time::parse_timestamp;

    #[test]
    fn test_label() {
        let key = MonthKey { year: 2025, month: 8 };
        assert_eq!(key.label(), "August 2025");
    }

    #[test]
    fn test_invalid_month_label_does_not_panic() {
        let key = MonthKey { year: 2025, month: 13 };
        assert!(!key.is_valid());
        assert_eq!(key.label(), "2025-13");
    }

    #[test]
    fn test_month_options_sorted_and_distinct() {
        let readings = vec![
            reading(1, "2025-08-10 10:00:00"),
            reading(2, "2025-07-01 10:00:00"),
            reading(3, "2025-08-20 10:00:00"),
            reading(4, "2024-12-31 23:59:59"),
        ];

        let options = month_options(&readings);

        assert_eq!(
            options,
            vec![
                MonthKey { year: 2024, month: 12 },
                MonthKey { year: 2025, month: 7 },
                MonthKey { year: 2025, month: 8 },
            ]
        );
    }

    fn reading(id: i64, ts: &str) -> Reading {
        Reading::new(ReadingId(id), parse_timestamp(ts))
    }
}
