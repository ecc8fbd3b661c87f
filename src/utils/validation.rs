use crate::utils::error::{DepotError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DepotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DepotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DepotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DepotError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 驗證要寫回資料檔的欄位：不可為空，也不可包含分隔字元
pub fn validate_record_field(field_name: &str, value: &str, forbidden: &[char]) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DepotError::validation(format!("{} cannot be empty", field_name)));
    }
    if let Some(c) = value
        .chars()
        .find(|c| forbidden.contains(c) || *c == '\n' || *c == '\r')
    {
        return Err(DepotError::validation(format!(
            "{} '{}' contains a reserved character {:?}",
            field_name, value, c
        )));
    }
    Ok(())
}

pub fn validate_measurement(field_name: &str, value: f64, allow_zero: bool) -> Result<()> {
    let ok = value.is_finite() && if allow_zero { value >= 0.0 } else { value > 0.0 };
    if !ok {
        let expected = if allow_zero { "non-negative" } else { "positive" };
        return Err(DepotError::validation(format!(
            "{} must be a {} number, got {}",
            field_name, expected, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("sources.customers", "Custs.csv").is_ok());
        assert!(validate_path("sources.customers", "").is_err());
        assert!(validate_path("sources.customers", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("report.long_stored_days", 30u32, 0, 3650).is_ok());
        assert!(validate_range("report.long_stored_days", 4000u32, 0, 3650).is_err());
    }

    #[test]
    fn test_validate_record_field() {
        assert!(validate_record_field("name", "Alice", &[',']).is_ok());
        assert!(validate_record_field("name", "   ", &[',']).is_err());
        assert!(validate_record_field("name", "Smith, J", &[',']).is_err());
        assert!(validate_record_field("parcel id", "P1;P2", &[',', ';']).is_err());
        assert!(validate_record_field("name", "two\nlines", &[',']).is_err());
    }

    #[test]
    fn test_validate_measurement() {
        assert!(validate_measurement("length", 10.0, false).is_ok());
        assert!(validate_measurement("length", 0.0, false).is_err());
        assert!(validate_measurement("weight", 0.0, true).is_ok());
        assert!(validate_measurement("weight", -1.0, true).is_err());
        assert!(validate_measurement("weight", f64::NAN, true).is_err());
    }
}
