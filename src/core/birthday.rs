//! Upcoming birthdays with weekend rollover.
//!
//! A birthday is "upcoming" when its next occurrence falls within the window
//! starting today (offsets `0..window_days`). Saturday and Sunday birthdays are
//! congratulated on the following Monday. People born on February 29 are
//! congratulated on March 1 in non-leap years.

use crate::domain::model::{Congratulation, UserRecord, BIRTHDAY_FORMAT};
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::{Result, ToolkitError};
use crate::utils::validation::{expect_string, json_type_name, validate_non_empty_string};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

pub const WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BirthdayPolicy {
    pub window_days: i64,
}

impl Default for BirthdayPolicy {
    fn default() -> Self {
        Self {
            window_days: WINDOW_DAYS,
        }
    }
}

fn birthday_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[0-9]{4}\.[0-9]{1,2}\.[0-9]{1,2}$").expect("birthday pattern is a valid regex")
    })
}

pub fn parse_birthday(value: &str) -> Result<NaiveDate> {
    validate_non_empty_string("birthday", value)?;
    // chrono 會略過數字前的空白並接受正負號，先用正規表達式擋掉
    if !birthday_regex().is_match(value) {
        return Err(ToolkitError::parse("birthday", value, "expected YYYY.MM.DD"));
    }
    NaiveDate::parse_from_str(value, BIRTHDAY_FORMAT)
        .map_err(|e| ToolkitError::parse("birthday", value, format!("expected YYYY.MM.DD ({})", e)))
}

/// 指定年份中的生日；2/29 在平年改為 3/1
fn occurrence_in(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        if month == 2 && day == 29 {
            NaiveDate::from_ymd_opt(year, 3, 1)
        } else {
            None
        }
    })
}

/// First occurrence of the birthday's month and day on or after `today`.
pub fn next_occurrence(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let (month, day) = (birthday.month(), birthday.day());
    let this_year = occurrence_in(today.year(), month, day)?;
    if this_year >= today {
        Some(this_year)
    } else {
        occurrence_in(today.year() + 1, month, day)
    }
}

/// 週六順延兩天、週日順延一天，平日不變
pub fn roll_over_weekend(date: NaiveDate) -> Option<NaiveDate> {
    let shift = match date.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    date.checked_add_days(Days::new(shift))
}

/// 檢查單筆 JSON 記錄的結構並轉成 `UserRecord`
pub fn user_from_value(value: &Value) -> Result<UserRecord> {
    let object = value.as_object().ok_or_else(|| {
        ToolkitError::shape(format!("user must be an object, got {}", json_type_name(value)))
    })?;

    let (Some(name), Some(birthday)) = (object.get("name"), object.get("birthday")) else {
        return Err(ToolkitError::shape("user must have 'name' and 'birthday' keys"));
    };

    Ok(UserRecord {
        name: expect_string("name", name)?.to_string(),
        birthday: expect_string("birthday", birthday)?.to_string(),
    })
}

impl BirthdayPolicy {
    /// `Ok(None)` 表示生日不在範圍內；`Err` 表示記錄本身不合法
    pub fn congratulate(&self, user: &UserRecord, today: NaiveDate) -> Result<Option<Congratulation>> {
        validate_non_empty_string("name", &user.name)?;
        let birthday = parse_birthday(&user.birthday)?;

        let occurrence = next_occurrence(birthday, today).ok_or_else(|| {
            ToolkitError::out_of_range("birthday", &user.birthday, "next occurrence is out of calendar range")
        })?;

        let days_until = (occurrence - today).num_days();
        if !(0..self.window_days).contains(&days_until) {
            return Ok(None);
        }

        let congratulation_date = roll_over_weekend(occurrence).ok_or_else(|| {
            ToolkitError::out_of_range("birthday", &user.birthday, "congratulation date is out of calendar range")
        })?;

        Ok(Some(Congratulation {
            name: user.name.clone(),
            congratulation_date: congratulation_date.format(BIRTHDAY_FORMAT).to_string(),
        }))
    }

    pub fn upcoming_at(&self, users: &[UserRecord], today: NaiveDate) -> Vec<Congratulation> {
        users
            .iter()
            .enumerate()
            .filter_map(|(index, user)| match self.congratulate(user, today) {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!("Skipping user #{}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    /// 動態輸入：必須是陣列，格式錯誤的元素逐筆略過
    pub fn try_upcoming_json_at(&self, records: &Value, today: NaiveDate) -> Result<Vec<Congratulation>> {
        let records = records.as_array().ok_or_else(|| {
            ToolkitError::type_mismatch("users", "an array", json_type_name(records))
        })?;

        let mut upcoming = Vec::new();
        for (index, record) in records.iter().enumerate() {
            let result = user_from_value(record).and_then(|user| self.congratulate(&user, today));
            match result {
                Ok(Some(congratulation)) => upcoming.push(congratulation),
                Ok(None) => {}
                Err(e) => {
                    let e = ToolkitError::shape(format!("user #{}: {}", index, e));
                    tracing::warn!("Skipping record: {}", e);
                }
            }
        }

        tracing::debug!("{} of {} users have upcoming birthdays", upcoming.len(), records.len());
        Ok(upcoming)
    }

    pub fn upcoming_json_at(&self, records: &Value, today: NaiveDate) -> Vec<Congratulation> {
        match self.try_upcoming_json_at(records, today) {
            Ok(upcoming) => upcoming,
            Err(e) => {
                tracing::warn!("Birthday lookup rejected: {}", e);
                Vec::new()
            }
        }
    }

    pub fn upcoming_json_with_clock<C: Clock>(&self, records: &Value, clock: &C) -> Vec<Congratulation> {
        self.upcoming_json_at(records, clock.today())
    }
}

/// Users from a JSON array whose birthdays fall within the next week, in input order.
/// Anything other than an array yields an empty `Vec`.
pub fn upcoming_birthdays(records: &Value) -> Vec<Congratulation> {
    upcoming_birthdays_with_clock(records, &SystemClock)
}

pub fn upcoming_birthdays_with_clock<C: Clock>(records: &Value, clock: &C) -> Vec<Congratulation> {
    BirthdayPolicy::default().upcoming_json_with_clock(records, clock)
}

pub fn try_upcoming_birthdays(records: &Value) -> Result<Vec<Congratulation>> {
    BirthdayPolicy::default().try_upcoming_json_at(records, SystemClock.today())
}

pub fn upcoming_birthdays_for(users: &[UserRecord]) -> Vec<Congratulation> {
    BirthdayPolicy::default().upcoming_at(users, SystemClock.today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_birthday() {
        assert_eq!(parse_birthday("1990.06.07").unwrap(), ymd(1990, 6, 7));
        assert_eq!(parse_birthday("2000.02.29").unwrap(), ymd(2000, 2, 29));
        assert_eq!(parse_birthday("1990.6.7").unwrap(), ymd(1990, 6, 7));
        for bad in [
            "1990-06-07",
            "07.06.1990",
            "1990.13.01",
            "2001.02.29",
            "",
            "  ",
            " 1990.06.07",
            "+1990.06.07",
            "1990. 06.07",
            "1990.06.07 ",
            "１９９０.06.07",
        ] {
            assert!(parse_birthday(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_next_occurrence() {
        let today = ymd(2025, 6, 2);
        assert_eq!(next_occurrence(ymd(1990, 6, 2), today), Some(ymd(2025, 6, 2)));
        assert_eq!(next_occurrence(ymd(1990, 6, 1), today), Some(ymd(2026, 6, 1)));
        assert_eq!(next_occurrence(ymd(1990, 12, 31), today), Some(ymd(2025, 12, 31)));
    }

    #[test]
    fn test_next_occurrence_leap_day() {
        assert_eq!(next_occurrence(ymd(2000, 2, 29), ymd(2025, 2, 24)), Some(ymd(2025, 3, 1)));
        assert_eq!(next_occurrence(ymd(2000, 2, 29), ymd(2024, 2, 26)), Some(ymd(2024, 2, 29)));
        assert_eq!(next_occurrence(ymd(2000, 2, 29), ymd(2025, 3, 1)), Some(ymd(2025, 3, 1)));
        assert_eq!(next_occurrence(ymd(2000, 2, 29), ymd(2025, 3, 2)), Some(ymd(2026, 3, 1)));
        assert_eq!(next_occurrence(ymd(2000, 2, 29), ymd(2027, 3, 2)), Some(ymd(2028, 2, 29)));
    }

    #[test]
    fn test_roll_over_weekend() {
        assert_eq!(roll_over_weekend(ymd(2025, 6, 7)), Some(ymd(2025, 6, 9)));
        assert_eq!(roll_over_weekend(ymd(2025, 6, 8)), Some(ymd(2025, 6, 9)));
        for day in 2..=6 {
            assert_eq!(roll_over_weekend(ymd(2025, 6, day)), Some(ymd(2025, 6, day)));
        }
    }

    #[test]
    fn test_user_from_value_shapes() {
        assert!(user_from_value(&json!({"name": "Ann", "birthday": "1990.01.01"})).is_ok());

        let missing = user_from_value(&json!({"name": "Ann"})).unwrap_err();
        assert_eq!(missing.category(), ErrorCategory::Shape);
        let not_object = user_from_value(&json!(["Ann", "1990.01.01"])).unwrap_err();
        assert_eq!(not_object.category(), ErrorCategory::Shape);
        let numeric_name = user_from_value(&json!({"name": 7, "birthday": "1990.01.01"})).unwrap_err();
        assert_eq!(numeric_name.category(), ErrorCategory::Type);
    }

    #[test]
    fn test_window_bounds() {
        let policy = BirthdayPolicy::default();
        let today = ymd(2025, 6, 2);
        let six_ahead = UserRecord::new("Six", "1990.06.08");
        let seven_ahead = UserRecord::new("Seven", "1990.06.09");
        assert!(policy.congratulate(&six_ahead, today).unwrap().is_some());
        assert!(policy.congratulate(&seven_ahead, today).unwrap().is_none());
    }

    #[test]
    fn test_custom_window() {
        let policy = BirthdayPolicy { window_days: 1 };
        let today = ymd(2025, 6, 2);
        let users = vec![
            UserRecord::new("Today", "1980.06.02"),
            UserRecord::new("Tomorrow", "1980.06.03"),
        ];
        let upcoming = policy.upcoming_at(&users, today);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].name, "Today");
    }

    #[test]
    fn test_non_array_input_is_rejected() {
        let policy = BirthdayPolicy::default();
        let today = ymd(2025, 6, 2);
        for input in [json!({"name": "Ann", "birthday": "1990.06.03"}), json!("users"), json!(null), json!(3)] {
            let err = policy.try_upcoming_json_at(&input, today).unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Type);
            assert!(policy.upcoming_json_at(&input, today).is_empty());
        }
    }
}
