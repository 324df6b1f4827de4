use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Type error: {field} must be {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid value for {field} ({value}): {reason}")]
    OutOfRange {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Cannot parse {field} '{value}': {reason}")]
    Parse {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed record: {message}")]
    Shape { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// 錯誤分類，對應輸入驗證的四種失敗類型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Type,
    Range,
    Parse,
    Shape,
    Config,
}

impl ToolkitError {
    pub fn type_mismatch(field: &str, expected: &'static str, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.to_string(),
            expected,
            found: found.into(),
        }
    }

    pub fn out_of_range(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeMismatch { .. } => ErrorCategory::Type,
            Self::OutOfRange { .. } => ErrorCategory::Range,
            Self::Parse { .. } => ErrorCategory::Parse,
            Self::Shape { .. } => ErrorCategory::Shape,
            Self::Io(_) | Self::Config { .. } => ErrorCategory::Config,
        }
    }

    /// 給終端使用者看的簡短說明
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::TypeMismatch { field, expected, .. } => {
                format!("'{}' has the wrong type, expected {}", field, expected)
            }
            Self::OutOfRange { field, reason, .. } => format!("'{}' is out of range: {}", field, reason),
            Self::Parse { field, .. } => match field.as_str() {
                "birthday" => "Birthday must use the format YYYY.MM.DD".to_string(),
                "date" => "Please use a valid date in the format YYYY-MM-DD".to_string(),
                _ => format!("'{}' could not be parsed", field),
            },
            Self::Shape { message } => format!("Record skipped: {}", message),
            Self::Io(e) => format!("Could not read settings: {}", e),
            Self::Config { message } => format!("Invalid settings: {}", message),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolkitError>;
