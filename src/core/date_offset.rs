//! Signed day offset between a calendar date and today.

use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::{Result, ToolkitError};
use crate::utils::validation::{expect_string, validate_non_empty_string};
use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::OnceLock;

// YYYY-MM-DD[(T| )HH[:MM[:SS[.fff]]][Z|±HH[:MM]]]
const DATE_PATTERN: &str = r"^([0-9]{4})-([0-9]{2})-([0-9]{2})(?:[T ]([0-9]{2})(?::([0-9]{2})(?::([0-9]{2})(?:[.,][0-9]+)?)?)?(Z|[+-]([0-9]{2})(?::?([0-9]{2}))?)?)?$";

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is a valid regex"))
}

fn capture_u32(caps: &Captures<'_>, index: usize) -> u32 {
    caps.get(index)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// 解析日期字串，只保留日期部分；時間與時區僅做格式檢查
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    validate_non_empty_string("date", input)?;

    // 前後空白不做修剪，必須完整符合格式
    let caps = date_regex()
        .captures(input)
        .ok_or_else(|| ToolkitError::parse("date", input, "expected YYYY-MM-DD"))?;

    let year = capture_u32(&caps, 1) as i32;
    let month = capture_u32(&caps, 2);
    let day = capture_u32(&caps, 3);
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ToolkitError::parse("date", input, "no such calendar day"))?;

    if caps.get(4).is_some() {
        let (hour, minute, second) = (capture_u32(&caps, 4), capture_u32(&caps, 5), capture_u32(&caps, 6));
        if NaiveTime::from_hms_opt(hour, minute, second).is_none() {
            return Err(ToolkitError::parse("date", input, "invalid time of day"));
        }
    }

    if caps.get(8).is_some() && (capture_u32(&caps, 8) > 23 || capture_u32(&caps, 9) > 59) {
        return Err(ToolkitError::parse("date", input, "invalid timezone offset"));
    }

    Ok(date)
}

pub fn try_days_until_at(date: &str, today: NaiveDate) -> Result<i64> {
    let target = parse_date(date)?;
    let days = (target - today).num_days();
    tracing::debug!("{} is {} day(s) from {}", target, days, today);
    Ok(days)
}

pub fn try_days_until_with_clock<C: Clock>(date: &str, clock: &C) -> Result<i64> {
    try_days_until_at(date, clock.today())
}

pub fn try_days_until(date: &str) -> Result<i64> {
    try_days_until_with_clock(date, &SystemClock)
}

pub fn days_until_with_clock<C: Clock>(date: &str, clock: &C) -> Option<i64> {
    match try_days_until_with_clock(date, clock) {
        Ok(days) => Some(days),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

/// Days from today's local date to `date`: positive in the future, negative in the past.
/// Returns `None` when `date` is empty or not a valid `YYYY-MM-DD` date.
pub fn days_until(date: &str) -> Option<i64> {
    days_until_with_clock(date, &SystemClock)
}

pub fn days_until_json(date: &Value) -> Option<i64> {
    match expect_string("date", date) {
        Ok(date) => days_until(date),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FixedClock;
    use crate::utils::error::ErrorCategory;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_plain_and_extended_forms() {
        let expected = ymd(2025, 1, 15);
        for input in [
            "2025-01-15",
            "2025-01-15T14:30:00",
            "2025-01-15 14:30",
            "2025-01-15T23:59:59.999999",
            "2025-01-15T08:00:00Z",
            "2025-01-15T08:00:00+02:00",
            "2025-01-15T23:00:00-0500",
        ] {
            assert_eq!(parse_date(input).unwrap(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "2025/01/15",
            "15-01-2025",
            "2025-1-15",
            "20250115",
            "2025-01-15T",
            "2025-01-15T25:00",
            "2025-01-15T10:61",
            "2025-01-15T10:00+24:00",
            "2025-01-15 garbage",
            "２０２５-01-15",
            "  2025-01-15\n",
            " 2025-01-15",
            "2025-01-15 ",
        ] {
            let err = parse_date(input).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Parse, "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_rejects_impossible_days() {
        assert!(parse_date("2025-02-29").is_err());
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("2025-04-31").is_err());
        assert!(parse_date("2025-00-10").is_err());
        assert_eq!(parse_date("2024-02-29").unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_empty_is_rejected_before_parsing() {
        assert_eq!(parse_date("").unwrap_err().category(), ErrorCategory::Range);
        assert_eq!(parse_date("   ").unwrap_err().category(), ErrorCategory::Range);
    }

    #[test]
    fn test_offsets_relative_to_clock() {
        let clock = FixedClock(ymd(2024, 3, 1));
        assert_eq!(days_until_with_clock("2024-03-01", &clock), Some(0));
        assert_eq!(days_until_with_clock("2024-03-02", &clock), Some(1));
        assert_eq!(days_until_with_clock("2024-02-29", &clock), Some(-1));
        assert_eq!(days_until_with_clock("2025-03-01", &clock), Some(365));
        assert_eq!(days_until_with_clock("2024-03-01T23:59:59-12:00", &clock), Some(0));
        assert_eq!(days_until_with_clock("2025-02-29", &clock), None);
    }

    #[test]
    fn test_json_requires_string() {
        assert_eq!(days_until_json(&serde_json::json!(20250115)), None);
        assert_eq!(days_until_json(&serde_json::json!(null)), None);
        assert_eq!(days_until_json(&serde_json::json!(["2025-01-15"])), None);
    }
}
