use serde::{Deserialize, Serialize};

/// 出生日期在輸入中的固定格式
pub const BIRTHDAY_FORMAT: &str = "%Y.%m.%d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    pub min: i64,
    pub max: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneRecord {
    pub raw: String,
    #[serde(default = "default_country_code")]
    pub country_code: i64,
}

fn default_country_code() -> i64 {
    crate::core::phone::DEFAULT_COUNTRY_CODE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub birthday: String,
}

impl UserRecord {
    pub fn new(name: impl Into<String>, birthday: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            birthday: birthday.into(),
        }
    }
}

/// 祝賀日期，`congratulation_date` 以 `YYYY.MM.DD` 表示
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Congratulation {
    pub name: String,
    pub congratulation_date: String,
}
