// Date expression parsing and formatting for the CLI

use chrono::{Days, Local, NaiveDate, NaiveDateTime, TimeZone};
use anyhow::{Context, Result};

use crate::board::Today;

/// Parse a due-date expression into a Unix timestamp.
///
/// Supported: `2026-01-10` (midnight), `2026-01-10T14:30`, `today`,
/// `tomorrow`, `+3d`, `-2d`. Times are read in the zone of `today`, with
/// the offset in effect on the named date.
pub fn parse_date_expr<Tz: TimeZone>(expr: &str, today: &Today<Tz>) -> Result<i64> {
    let expr = expr.trim();

    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        return start_of_day(today, date, expr);
    }

    if let Ok(datetime) = NaiveDateTime::parse_from_str(expr, "%Y-%m-%dT%H:%M") {
        return today.timezone()
            .from_local_datetime(&datetime)
            .earliest()
            .map(|dt| dt.timestamp())
            .ok_or_else(|| anyhow::anyhow!("Time does not exist in the local timezone: {}", expr));
    }

    let days: i64 = match expr.to_ascii_lowercase().as_str() {
        "today" => 0,
        "tomorrow" => 1,
        other => parse_day_offset(other)
            .with_context(|| format!("Unsupported date expression: {}. Use YYYY-MM-DD, YYYY-MM-DDTHH:MM, today, tomorrow or +Nd/-Nd", expr))?,
    };

    let span = Days::new(days.unsigned_abs());
    let date = if days < 0 {
        today.date().checked_sub_days(span)
    } else {
        today.date().checked_add_days(span)
    }
    .ok_or_else(|| anyhow::anyhow!("Date out of range: {}", expr))?;
    start_of_day(today, date, expr)
}

/// `+3d` / `-2d`
fn parse_day_offset(expr: &str) -> Result<i64> {
    let body = expr.strip_suffix('d')
        .ok_or_else(|| anyhow::anyhow!("missing 'd' suffix"))?;
    let (sign, digits) = match body.chars().next() {
        Some('+') => (1, &body[1..]),
        Some('-') => (-1, &body[1..]),
        _ => anyhow::bail!("missing sign"),
    };
    let n: i64 = digits.parse().context("invalid day count")?;
    Ok(sign * n)
}

fn start_of_day<Tz: TimeZone>(today: &Today<Tz>, date: NaiveDate, expr: &str) -> Result<i64> {
    today.start_of(date)
        .ok_or_else(|| anyhow::anyhow!("Date out of range: {}", expr))
}

/// Parse a date expression in the local timezone; relative ones count from
/// the local clock.
pub fn parse_local_date_expr(expr: &str) -> Result<i64> {
    parse_date_expr(expr, &Today::now_local())
}

/// Resolve the board's "today": an explicit `YYYY-MM-DD` or the local clock.
/// Either way the board reads due dates in the local timezone.
pub fn resolve_today(expr: Option<&str>) -> Result<Today<Local>> {
    let Some(expr) = expr else {
        return Ok(Today::now_local());
    };
    let date = NaiveDate::parse_from_str(expr.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid --today value '{}'. Expected YYYY-MM-DD", expr))?;
    Ok(Today::local(date))
}

/// Format a timestamp as its calendar date in the board's zone
pub fn format_date<Tz: TimeZone>(ts: i64, today: &Today<Tz>) -> String {
    today.date_of(ts)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "invalid".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use chrono_tz::America::New_York;

    fn today() -> Today<FixedOffset> {
        Today::utc(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
    }

    fn midnight(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().unwrap().timestamp()
    }

    #[test]
    fn test_absolute_dates() {
        assert_eq!(parse_date_expr("2025-06-10", &today()).unwrap(), midnight(2025, 6, 10));
        assert_eq!(
            parse_date_expr("2025-06-10T14:30", &today()).unwrap(),
            midnight(2025, 6, 10) + 14 * 3600 + 30 * 60
        );
    }

    #[test]
    fn test_relative_dates() {
        assert_eq!(parse_date_expr("today", &today()).unwrap(), midnight(2025, 6, 2));
        assert_eq!(parse_date_expr("Tomorrow", &today()).unwrap(), midnight(2025, 6, 3));
        assert_eq!(parse_date_expr("+2d", &today()).unwrap(), midnight(2025, 6, 4));
        assert_eq!(parse_date_expr("-3d", &today()).unwrap(), midnight(2025, 5, 30));
    }

    #[test]
    fn test_invalid_dates() {
        assert!(parse_date_expr("next week", &today()).is_err());
        assert!(parse_date_expr("3d", &today()).is_err());
        assert!(parse_date_expr("+xd", &today()).is_err());
        assert!(parse_date_expr("2025-13-01", &today()).is_err());
    }

    #[test]
    fn test_huge_day_offsets_are_errors() {
        let err = parse_date_expr("+200000000000000d", &today()).unwrap_err();
        assert!(err.to_string().contains("Date out of range"));
        let err = parse_date_expr("-200000000000000d", &today()).unwrap_err();
        assert!(err.to_string().contains("Date out of range"));
        assert!(parse_date_expr("+99999999999999999999d", &today()).is_err());
    }

    #[test]
    fn test_dates_keep_their_own_dst_offset() {
        // Board on March 8th (EST), due dates after the switch to EDT
        let t = Today::new(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(), New_York);
        let edt_midnight = New_York.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).single().unwrap().timestamp();
        assert_eq!(parse_date_expr("2025-03-10", &t).unwrap(), edt_midnight);
        assert_eq!(parse_date_expr("+2d", &t).unwrap(), edt_midnight);
        assert_eq!(format_date(edt_midnight, &t), "2025-03-10");
    }

    #[test]
    fn test_nonexistent_local_time() {
        let t = Today::new(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap(), New_York);
        assert!(parse_date_expr("2025-03-09T02:30", &t).is_err());
        assert!(parse_date_expr("2025-03-09T03:30", &t).is_ok());
    }

    #[test]
    fn test_dates_use_board_offset() {
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let t = Today::new(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(), est);
        let ts = parse_date_expr("today", &t).unwrap();
        assert_eq!(ts, midnight(2025, 6, 2) + 5 * 3600);
        assert_eq!(format_date(ts, &t), "2025-06-02");
    }

    #[test]
    fn test_resolve_today_explicit() {
        let t = resolve_today(Some("2025-06-02")).unwrap();
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert!(resolve_today(Some("June 2")).is_err());
        assert!(resolve_today(None).is_ok());
    }

    #[test]
    fn test_local_absolute_date_matches_resolved_today() {
        let ts = parse_local_date_expr("2025-01-15").unwrap();
        let board_today = resolve_today(Some("2025-01-15")).unwrap();
        assert_eq!(format_date(ts, &board_today), "2025-01-15");

        let ts = parse_local_date_expr("2025-07-15T23:30").unwrap();
        let board_today = resolve_today(Some("2025-07-15")).unwrap();
        assert_eq!(format_date(ts, &board_today), "2025-07-15");
    }
}
