//! Phone number canonicalisation to `+<digits>`.
//!
//! This is a reformatter for numbers assumed to belong to one country. A number
//! that already carries a different country code is not translated: the
//! configured code is inserted in front of its digits, so
//! `+15551234567` with code 38 becomes `+3815551234567`.

use crate::domain::model::PhoneRecord;
use crate::utils::error::{Result, ToolkitError};
use crate::utils::validation::{expect_integer, expect_string, validate_at_least};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

pub const DEFAULT_COUNTRY_CODE: i64 = 38;
pub const MIN_SUBSCRIBER_DIGITS: usize = 9;

fn non_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9]+").expect("non-digit pattern is a valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhonePolicy {
    pub default_country_code: i64,
    /// 國碼之外至少需要的位數
    pub min_subscriber_digits: usize,
}

impl Default for PhonePolicy {
    fn default() -> Self {
        Self {
            default_country_code: DEFAULT_COUNTRY_CODE,
            min_subscriber_digits: MIN_SUBSCRIBER_DIGITS,
        }
    }
}

impl PhonePolicy {
    pub fn try_normalize(&self, raw: &str, country_code: i64) -> Result<String> {
        validate_at_least("country_code", country_code, 1)?;
        let code = country_code.to_string();

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ToolkitError::out_of_range(
                "phone_number",
                format!("{:?}", raw),
                "cannot be empty or whitespace-only",
            ));
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let with_code = if rest.starts_with(code.as_str()) {
            format!("+{}", rest)
        } else {
            format!("+{}{}", code, rest)
        };

        let digits = non_digits().replace_all(&with_code, "");
        let required = code.len() + self.min_subscriber_digits;
        if digits.len() < required {
            return Err(ToolkitError::out_of_range(
                "phone_number",
                raw,
                format!(
                    "too short, expected at least {} digits after '+', got {}",
                    required,
                    digits.len()
                ),
            ));
        }

        Ok(format!("+{}", digits))
    }

    pub fn normalize(&self, raw: &str, country_code: i64) -> Option<String> {
        match self.try_normalize(raw, country_code) {
            Ok(phone) => Some(phone),
            Err(e) => {
                tracing::warn!("Phone number rejected: {}", e);
                None
            }
        }
    }

    /// 使用設定中的預設國碼
    pub fn normalize_default(&self, raw: &str) -> Option<String> {
        self.normalize(raw, self.default_country_code)
    }

    pub fn normalize_record(&self, record: &PhoneRecord) -> Option<String> {
        self.normalize(&record.raw, record.country_code)
    }

    /// `country_code` 為 `None` 時使用預設國碼
    pub fn try_normalize_json(&self, raw: &Value, country_code: Option<&Value>) -> Result<String> {
        let raw = expect_string("phone_number", raw)?;
        let country_code = match country_code {
            Some(value) => expect_integer("country_code", value)?,
            None => self.default_country_code,
        };
        self.try_normalize(raw, country_code)
    }

    pub fn normalize_json(&self, raw: &Value, country_code: Option<&Value>) -> Option<String> {
        match self.try_normalize_json(raw, country_code) {
            Ok(phone) => Some(phone),
            Err(e) => {
                tracing::warn!("Phone number rejected: {}", e);
                None
            }
        }
    }
}

/// Canonical `+<digits>` form of `raw` under `country_code`, or `None` when invalid.
pub fn normalize_phone(raw: &str, country_code: i64) -> Option<String> {
    PhonePolicy::default().normalize(raw, country_code)
}

pub fn try_normalize_phone(raw: &str, country_code: i64) -> Result<String> {
    PhonePolicy::default().try_normalize(raw, country_code)
}

pub fn normalize_phone_json(raw: &Value, country_code: Option<&Value>) -> Option<String> {
    PhonePolicy::default().normalize_json(raw, country_code)
}
