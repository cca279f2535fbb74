use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Midnight at the start of the given instant's calendar day.
pub fn start_of_day(at: DateTime<Local>) -> DateTime<Local> {
    let midnight = at
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always a valid time");

    //earliest resolution on a DST gap, falling back to the instant itself
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or(at)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    match first_of_next.and_then(|d| d.pred_opt()) {
        Some(last) => last.day(),
        None => 0,
    }
}

/// Week-of-month index: days 1-7 -> 1, 8-14 -> 2, and so on.
pub fn week_of_month(date: NaiveDate) -> u32 {
    1 + (date.day() - 1) / 7
}

/// Lenient timestamp parsing. RFC 3339 first, then the plain
/// `YYYY-MM-DD HH:MM:SS` form some meters emit (interpreted as local time).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }

    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn test_week_of_month() {
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()), 1);
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2025, 8, 7).unwrap()), 1);
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2025, 8, 8).unwrap()), 2);
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2025, 8, 31).unwrap()), 5);
    }

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let ts = parse_timestamp("2025-08-10T14:30:00+07:00");
        assert!(ts.is_some());
    }

    #[test]
    fn test_parse_timestamp_plain() {
        let ts = parse_timestamp("2025-08-10 14:30:00").unwrap();
        assert_eq!(ts.date_naive(), NaiveDate::from_ymd_opt(2025, 8, 10).unwrap());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday-ish").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn test_start_of_day() {
        let at = parse_timestamp("2025-08-10 14:30:00").unwrap();
        let midnight = start_of_day(at);
        assert_eq!(midnight.date_naive(), at.date_naive());
        assert_eq!(midnight.time(), chrono::NaiveTime::MIN);
    }
}
