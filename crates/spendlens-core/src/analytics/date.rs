use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::analytics::filter::DateRange;
use crate::{EngineError, EngineResult};

/// First day of every weekly bucket. Applied by every weekly rollup.
pub const WEEK_START: Weekday = Weekday::Sun;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Some(Self::Day),
            "week" | "weekly" => Some(Self::Week),
            "month" | "monthly" => Some(Self::Month),
            "year" | "yearly" => Some(Self::Year),
            _ => None,
        }
    }

    /// Start date of the bucket containing `date`.
    pub fn anchor(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => {
                let offset = i64::from(date.weekday().days_since(WEEK_START));
                date - Duration::days(offset)
            }
            Self::Month => first_of_month(date.year(), date.month()).unwrap_or(date),
            Self::Year => first_of_month(date.year(), 1).unwrap_or(date),
        }
    }

    /// Start date of the bucket after the one anchored at `anchor`.
    pub fn advance(self, anchor: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => anchor + Duration::days(1),
            Self::Week => anchor + Duration::days(7),
            Self::Month => add_months_clamped(anchor, 1),
            Self::Year => add_months_clamped(anchor, 12),
        }
    }
}

pub fn build_date_range(
    from: Option<&str>,
    to: Option<&str>,
    command: &str,
) -> EngineResult<DateRange> {
    let parsed_from = match from {
        Some(value) => Some(parse_iso_date_strict(value, "from", command)?),
        None => None,
    };
    let parsed_to = match to {
        Some(value) => Some(parse_iso_date_strict(value, "to", command)?),
        None => None,
    };

    if let (Some(start), Some(end)) = (parsed_from, parsed_to)
        && start > end
    {
        return Err(EngineError::invalid_argument_for_command(
            "Invalid date range: `from` must be on or before `to`.",
            Some(command),
        ));
    }

    Ok(DateRange {
        from: parsed_from,
        to: parsed_to,
    })
}

pub fn format_iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses a ledger date cell.
///
/// Accepts ISO dates (optionally followed by a time component), `YYYY/MM/DD`,
/// day-first numeric dates separated by `/`, `-` or `.` with two- or
/// four-digit years, and `DD Mon YYYY`.
pub fn parse_ledger_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let head = trimmed.get(..10).unwrap_or(trimmed);
    let rest = &trimmed[head.len()..];
    let has_time_suffix = rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ');
    if has_time_suffix {
        if looks_like_iso_date(head) {
            return NaiveDate::parse_from_str(head, "%Y-%m-%d").ok();
        }
        if looks_like_slashed_iso_date(head) {
            return NaiveDate::parse_from_str(head, "%Y/%m/%d").ok();
        }
    }

    let stamp = trimmed.split(['T', ' ']).next().unwrap_or(trimmed);
    if let Some(parsed) = parse_year_first(stamp) {
        return Some(parsed);
    }

    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    if let Some(parsed) = parse_day_first(date_part) {
        return Some(parsed);
    }

    NaiveDate::parse_from_str(trimmed, "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d %B %Y"))
        .ok()
}

pub fn add_months_clamped(date: NaiveDate, months: i32) -> NaiveDate {
    let current_month = i32::try_from(date.month()).unwrap_or(1);
    let mut raw_month = current_month + months;
    let mut year = date.year();

    while raw_month > 12 {
        raw_month -= 12;
        year += 1;
    }
    while raw_month < 1 {
        raw_month += 12;
        year -= 1;
    }

    let month_u32 = u32::try_from(raw_month).unwrap_or(1);
    let day = date.day().min(days_in_month(year, month_u32));
    if let Some(result) = NaiveDate::from_ymd_opt(year, month_u32, day) {
        return result;
    }
    date
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn last_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

fn parse_iso_date_strict(value: &str, field_name: &str, command: &str) -> EngineResult<NaiveDate> {
    if !looks_like_iso_date(value) {
        return Err(EngineError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with a real calendar date."),
            Some(command),
        ));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        EngineError::invalid_argument_for_command(
            &format!("`{field_name}` must use YYYY-MM-DD format with valid calendar values."),
            Some(command),
        )
    })
}

/// Year-first dates with unpadded month or day, such as `2024-1-5`.
fn parse_year_first(value: &str) -> Option<NaiveDate> {
    let year = value.get(..4)?;
    if !year.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    match value.as_bytes().get(4)? {
        b'-' => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
        b'/' => NaiveDate::parse_from_str(value, "%Y/%m/%d").ok(),
        _ => None,
    }
}

fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let separator = ['/', '-', '.']
        .into_iter()
        .find(|candidate| value.contains(*candidate))?;
    let parts = value.split(separator).collect::<Vec<&str>>();
    if parts.len() != 3 {
        return None;
    }
    if !parts
        .iter()
        .all(|part| !part.is_empty() && part.chars().all(|character| character.is_ascii_digit()))
    {
        return None;
    }
    if parts[0].len() > 2 || parts[1].len() > 2 {
        return None;
    }

    let day = parts[0].parse::<u32>().ok()?;
    let month = parts[1].parse::<u32>().ok()?;
    let year = match parts[2].len() {
        4 => parts[2].parse::<i32>().ok()?,
        2 => expand_two_digit_year(parts[2].parse::<i32>().ok()?),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn expand_two_digit_year(value: i32) -> i32 {
    if value < 69 { 2000 + value } else { 1900 + value }
}

fn looks_like_iso_date(value: &str) -> bool {
    looks_like_year_first(value, b'-')
}

fn looks_like_slashed_iso_date(value: &str) -> bool {
    looks_like_year_first(value, b'/')
}

fn looks_like_year_first(value: &str, separator: u8) -> bool {
    if value.len() != 10 {
        return false;
    }
    let bytes = value.as_bytes();
    if bytes[4] != separator || bytes[7] != separator {
        return false;
    }

    for index in [0usize, 1, 2, 3, 5, 6, 8, 9] {
        if !bytes[index].is_ascii_digit() {
            return false;
        }
    }
    true
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        Granularity, add_months_clamped, build_date_range, format_iso_date, parse_ledger_date,
    };

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
    }

    #[test]
    fn month_clamping_handles_end_of_month_transitions() {
        let feb = add_months_clamped(date("2026-01-31"), 1);
        assert_eq!(format_iso_date(&feb), "2026-02-28");
        let mar = add_months_clamped(feb, 1);
        assert_eq!(format_iso_date(&mar), "2026-03-28");
    }

    #[test]
    fn build_date_range_rejects_inverted_ranges() {
        let result = build_date_range(Some("2026-03-01"), Some("2026-02-01"), "summary");
        assert!(result.is_err());
    }

    #[test]
    fn week_buckets_start_on_sunday() {
        // 2024-01-10 is a Wednesday; the Sunday before is 2024-01-07.
        assert_eq!(Granularity::Week.anchor(date("2024-01-10")), date("2024-01-07"));
        assert_eq!(Granularity::Week.anchor(date("2024-01-07")), date("2024-01-07"));
        assert_eq!(Granularity::Week.anchor(date("2024-01-06")), date("2023-12-31"));
    }

    #[test]
    fn month_and_year_buckets_anchor_on_day_one() {
        assert_eq!(Granularity::Month.anchor(date("2024-02-29")), date("2024-02-01"));
        assert_eq!(Granularity::Year.anchor(date("2024-08-15")), date("2024-01-01"));
        assert_eq!(Granularity::Year.advance(date("2024-01-01")), date("2025-01-01"));
        assert_eq!(Granularity::Month.advance(date("2024-12-01")), date("2025-01-01"));
    }

    #[test]
    fn ledger_dates_accept_iso_and_day_first_forms() {
        let expected = Some(date("2024-01-05"));
        assert_eq!(parse_ledger_date("2024-01-05"), expected);
        assert_eq!(parse_ledger_date("2024-01-05 00:00:00"), expected);
        assert_eq!(parse_ledger_date("2024-01-05T13:45:00"), expected);
        assert_eq!(parse_ledger_date("2024/01/05"), expected);
        assert_eq!(parse_ledger_date("2024-1-5"), expected);
        assert_eq!(parse_ledger_date("2024/1/05"), expected);
        assert_eq!(parse_ledger_date("2024-1-5T08:30:00"), expected);
        assert_eq!(parse_ledger_date("05/01/2024"), expected);
        assert_eq!(parse_ledger_date("5/1/2024"), expected);
        assert_eq!(parse_ledger_date("05-01-2024"), expected);
        assert_eq!(parse_ledger_date("05.01.24"), expected);
        assert_eq!(parse_ledger_date("05 Jan 2024"), expected);
    }

    #[test]
    fn ledger_dates_reject_garbage_and_impossible_days() {
        assert_eq!(parse_ledger_date(""), None);
        assert_eq!(parse_ledger_date("yesterday"), None);
        assert_eq!(parse_ledger_date("31/02/2024"), None);
        assert_eq!(parse_ledger_date("2024-13-01"), None);
        assert_eq!(parse_ledger_date("05/01/202"), None);
        assert_eq!(parse_ledger_date("2024-2-30"), None);
    }
}
