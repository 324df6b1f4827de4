use crate::core::birthday::BirthdayPolicy;
use crate::core::phone::PhonePolicy;
use crate::core::ticket::TicketPolicy;
use crate::utils::error::{Result, ToolkitError};
use crate::utils::validation::{validate_at_least, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// 各元件的可調整參數；未填寫的欄位使用預設值
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ticket: TicketPolicy,
    pub phone: PhonePolicy,
    pub birthdays: BirthdayPolicy,
}

fn env_var_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"))
}

impl Settings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToolkitError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定，並替換 ${VAR} 環境變數
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        let settings: Self = toml::from_str(&processed).map_err(|e| ToolkitError::Config {
            message: format!("TOML parsing error: {}", e),
        })?;
        settings.validate()?;

        tracing::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    fn substitute_env_vars(content: &str) -> String {
        env_var_regex()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_at_least("ticket.min_floor", self.ticket.min_floor, 1)?;
        if self.ticket.max_ceiling <= self.ticket.min_floor {
            return Err(ToolkitError::Config {
                message: format!(
                    "ticket.max_ceiling ({}) must be greater than ticket.min_floor ({})",
                    self.ticket.max_ceiling, self.ticket.min_floor
                ),
            });
        }
        validate_at_least("phone.default_country_code", self.phone.default_country_code, 1)?;
        validate_range("birthdays.window_days", self.birthdays.window_days, 1, 366)?;
        Ok(())
    }
}
