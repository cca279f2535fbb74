use chrono::{DateTime, Local};

use super::reading::Reading;

/// Readings with `from <= timestamp <= to`, ascending by timestamp.
///
/// Pure selection used by the live view and the aggregation reducers.
/// Sorts its own output, so callers need not guarantee prior ordering.
/// Readings without a timestamp are never part of any window.
pub fn select_window(readings: &[Reading], from: DateTime<Local>, to: DateTime<Local>) -> Vec<Reading> {
    let mut selected: Vec<Reading> = readings
        .iter()
        .filter(|r| r.timestamp.is_some_and(|ts| ts >= from && ts <= to))
        .cloned()
        .collect();

    selected.sort_by_key(|r| r.timestamp);
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reading::ReadingId;
    use crate::core::time::parse_timestamp;

    #[test]
    fn test_bounds_inclusive() {
        let readings = vec![
            reading(1, Some("2025-08-10 10:00:00")),
            reading(2, Some("2025-08-10 11:00:00")),
            reading(3, Some("2025-08-10 12:00:00")),
            reading(4, Some("2025-08-10 13:00:00")),
        ];

        let window = select_window(
            &readings,
            parse_timestamp("2025-08-10 11:00:00").unwrap(),
            parse_timestamp("2025-08-10 12:00:00").unwrap(),
        );

        let ids: Vec<i64> = window.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_unsorted_input_comes_out_ascending() {
        let readings = vec![
            reading(3, Some("2025-08-10 12:00:00")),
            reading(1, Some("2025-08-10 10:00:00")),
            reading(2, Some("2025-08-10 11:00:00")),
        ];

        let window = select_window(
            &readings,
            parse_timestamp("2025-08-10 09:00:00").unwrap(),
            parse_timestamp("2025-08-10 13:00:00").unwrap(),
        );

        let ids: Vec<i64> = window.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_timestampless_excluded() {
        let readings = vec![reading(1, None), reading(2, Some("2025-08-10 11:00:00"))];

        let window = select_window(
            &readings,
            parse_timestamp("2025-08-10 00:00:00").unwrap(),
            parse_timestamp("2025-08-11 00:00:00").unwrap(),
        );

        assert_eq!(window.len(), 1);
        assert_eq!(window[0].id, ReadingId(2));
    }

    fn reading(id: i64, ts: Option<&str>) -> Reading {
        Reading::new(ReadingId(id), ts.and_then(parse_timestamp))
    }
}
