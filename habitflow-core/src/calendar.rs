//! Calendar-date helpers.
//!
//! Everything here works on [`NaiveDate`]: a year/month/day triple with no
//! time of day and no timezone, so weekday math can never drift across a
//! midnight boundary.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::error::{Error, Result};

/// Canonical date format used for storage and display.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a canonical `YYYY-MM-DD` string.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parse a `YYYY-MM` month into `(year, month)`.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(s.to_string()))?;
    Ok((first.year(), first.month()))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Weekday index, 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// The date `offset` days before `date`, or `None` past [`NaiveDate::MIN`].
pub fn checked_days_before(date: NaiveDate, offset: u32) -> Option<NaiveDate> {
    date.checked_sub_signed(Duration::days(i64::from(offset)))
}

/// The date `offset` days before `date`, clamped at [`NaiveDate::MIN`].
pub fn days_before(date: NaiveDate, offset: u32) -> NaiveDate {
    checked_days_before(date, offset).unwrap_or(NaiveDate::MIN)
}

/// Dates from `today` walking backward: `today`, `today - 1`, ... (`count`
/// dates). Stops early at the start of the calendar.
pub fn walk_back(today: NaiveDate, count: u32) -> impl Iterator<Item = (u32, NaiveDate)> {
    (0..count).map_while(move |i| checked_days_before(today, i).map(|date| (i, date)))
}

/// The `count` days ending at `today`, oldest first.
pub fn last_days(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let mut days: Vec<_> = walk_back(today, count).map(|(_, date)| date).collect();
    days.reverse();
    days
}

/// Number of days in a month, or 0 for an invalid year/month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(next) => (next - first).num_days() as u32,
        None => 0,
    }
}

/// All dates of a month in order (empty for an invalid year/month).
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// Short weekday name for an index (0 = Sunday).
pub fn weekday_short_name(index: u8) -> &'static str {
    match index {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "???",
    }
}

/// Parse a weekday name ("sun", "Monday") or index ("0".."6").
pub fn parse_weekday(s: &str) -> Option<u8> {
    let s = s.trim().to_lowercase();
    if let Ok(index) = s.parse::<u8>() {
        return (index <= 6).then_some(index);
    }
    let prefix = s.get(..3)?;
    match prefix {
        "sun" => Some(0),
        "mon" => Some(1),
        "tue" => Some(2),
        "wed" => Some(3),
        "thu" => Some(4),
        "fri" => Some(5),
        "sat" => Some(6),
        _ => None,
    }
}

/// Short month name (1 = Jan).
pub fn month_short_name(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_and_format() {
        let d = date("2024-02-29");
        assert_eq!(format_date(d), "2024-02-29");
        assert!(matches!(parse_date("2024-13-01"), Err(Error::InvalidDate(_))));
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn test_weekday_index_sunday_first() {
        assert_eq!(weekday_index(date("2024-06-02")), 0); // Sunday
        assert_eq!(weekday_index(date("2024-06-03")), 1); // Monday
        assert_eq!(weekday_index(date("2024-06-08")), 6); // Saturday
    }

    #[test]
    fn test_walk_back_crosses_month_and_year() {
        let dates: Vec<_> = walk_back(date("2024-01-01"), 3).collect();
        assert_eq!(
            dates,
            vec![
                (0, date("2024-01-01")),
                (1, date("2023-12-31")),
                (2, date("2023-12-30")),
            ]
        );
        assert_eq!(
            last_days(date("2024-03-01"), 2),
            vec![date("2024-02-29"), date("2024-03-01")]
        );
    }

    #[test]
    fn test_walk_back_stops_at_calendar_start() {
        let start = NaiveDate::MIN + Duration::days(2);
        let dates: Vec<_> = walk_back(start, u32::MAX).map(|(_, d)| d).collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates.last(), Some(&NaiveDate::MIN));
        assert_eq!(last_days(NaiveDate::MIN, 7), vec![NaiveDate::MIN]);
        assert_eq!(checked_days_before(NaiveDate::MIN, 1), None);
        assert_eq!(days_before(NaiveDate::MIN, 1), NaiveDate::MIN);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-02").unwrap(), (2024, 2));
        assert!(matches!(parse_month("2024-13"), Err(Error::InvalidDate(_))));
        assert!(parse_month("June").is_err());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 13), 0);
        assert_eq!(month_days(2024, 4).len(), 30);
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("sun"), Some(0));
        assert_eq!(parse_weekday("Saturday"), Some(6));
        assert_eq!(parse_weekday("3"), Some(3));
        assert_eq!(parse_weekday("7"), None);
        assert_eq!(parse_weekday("xy"), None);
    }
}
