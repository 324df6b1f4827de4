use crate::utils::error::{Result, ToolkitError};
use serde_json::Value;
use std::fmt::Display;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// JSON 值的型別名稱，用於錯誤訊息
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 要求值為整數，布林值即使可視為 0/1 也一律拒絕
pub fn expect_integer(field_name: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_i64() {
                Ok(v)
            } else if n.is_u64() {
                Err(ToolkitError::out_of_range(field_name, n, "integer does not fit in 64 bits"))
            } else {
                Err(ToolkitError::type_mismatch(field_name, "an integer", "float"))
            }
        }
        other => Err(ToolkitError::type_mismatch(
            field_name,
            "an integer",
            json_type_name(other),
        )),
    }
}

pub fn expect_string<'a>(field_name: &str, value: &'a Value) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ToolkitError::type_mismatch(field_name, "a string", json_type_name(value)))
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ToolkitError::out_of_range(
            field_name,
            format!("{:?}", value),
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_at_least<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min_value: T,
) -> Result<()> {
    if value < min_value {
        return Err(ToolkitError::out_of_range(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_at_most<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    max_value: T,
) -> Result<()> {
    if value > max_value {
        return Err(ToolkitError::out_of_range(
            field_name,
            value,
            format!("Value must be at most {}", max_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ToolkitError::out_of_range(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
