use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::error::{CostbookError, Result};

/// Inclusive calendar bounds for all range queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    raw.trim()
        .parse()
        .map_err(|_| CostbookError::Validation(format!("Invalid date '{raw}', expected YYYY-MM-DD")))
}

/// Resolve a period token and date into calendar bounds: `day`, `week`
/// (Monday through Sunday containing the date), `month`, `year`, or
/// `range` with date given as `start,end`.
pub fn resolve(period: &str, date: &str) -> Result<DateRange> {
    if period == "range" {
        let (start, end) = date.split_once(',').ok_or_else(|| {
            CostbookError::Validation(format!(
                "Invalid range '{date}', expected YYYY-MM-DD,YYYY-MM-DD"
            ))
        })?;
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        if end < start {
            return Err(CostbookError::Validation(format!(
                "Invalid range '{date}': end before start"
            )));
        }
        return Ok(DateRange { start, end });
    }

    let day = parse_date(date)?;
    match period {
        "day" => Ok(DateRange { start: day, end: day }),
        "week" => {
            let monday = day - Duration::days(day.weekday().num_days_from_monday() as i64);
            Ok(DateRange { start: monday, end: monday + Duration::days(6) })
        }
        "month" => {
            let first = day.with_day(1).unwrap();
            let last = first.checked_add_months(Months::new(1)).unwrap() - Duration::days(1);
            Ok(DateRange { start: first, end: last })
        }
        "year" => Ok(DateRange {
            start: NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(day.year(), 12, 31).unwrap(),
        }),
        other => Err(CostbookError::Validation(format!(
            "Invalid period '{other}'. Valid periods: day, week, month, year, range"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_day() {
        let r = resolve("day", "2026-01-15").unwrap();
        assert_eq!(r.start, date("2026-01-15"));
        assert_eq!(r.end, date("2026-01-15"));
    }

    #[test]
    fn test_week_spans_monday_to_sunday() {
        // 2026-01-15 is a Thursday.
        let r = resolve("week", "2026-01-15").unwrap();
        assert_eq!(r.start, date("2026-01-12"));
        assert_eq!(r.end, date("2026-01-18"));
        // A Monday is its own week start.
        let r = resolve("week", "2026-01-12").unwrap();
        assert_eq!(r.start, date("2026-01-12"));
    }

    #[test]
    fn test_month_handles_lengths() {
        let r = resolve("month", "2026-01-15").unwrap();
        assert_eq!(r.start, date("2026-01-01"));
        assert_eq!(r.end, date("2026-01-31"));
        let r = resolve("month", "2024-02-10").unwrap();
        assert_eq!(r.end, date("2024-02-29"));
        let r = resolve("month", "2026-12-05").unwrap();
        assert_eq!(r.end, date("2026-12-31"));
    }

    #[test]
    fn test_year() {
        let r = resolve("year", "2026-06-15").unwrap();
        assert_eq!(r.start, date("2026-01-01"));
        assert_eq!(r.end, date("2026-12-31"));
    }

    #[test]
    fn test_range() {
        let r = resolve("range", "2026-01-05,2026-03-20").unwrap();
        assert_eq!(r.start, date("2026-01-05"));
        assert_eq!(r.end, date("2026-03-20"));
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(resolve("range", "2026-03-20,2026-01-05").is_err());
        assert!(resolve("range", "2026-03-20").is_err());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(resolve("fortnight", "2026-01-15").is_err());
        assert!(resolve("day", "yesterday").is_err());
    }
}
