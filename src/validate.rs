//! Small input checks shared by the request DTOs. Messages match what the
//! forms show to the user.

use crate::error::AppError;

/// Smallest accepted ingredient weight or meal portion, in grams.
pub const MIN_GRAMS: f64 = 0.1;

/// Trimmed, non-empty name.
pub fn name(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    Ok(trimmed.to_string())
}

/// Empty descriptions are stored as absent.
pub fn description(raw: Option<String>) -> Option<String> {
    raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
}

pub fn non_negative(value: f64, label: &str) -> Result<f64, AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!(
            "{} must be a positive number",
            label
        )));
    }
    Ok(value)
}

pub fn grams(value: f64, label: &str) -> Result<f64, AppError> {
    if !value.is_finite() || value < MIN_GRAMS {
        return Err(AppError::Validation(format!(
            "{} must be greater than 0",
            label
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(name("  Oats ").unwrap(), "Oats");
        let err = name("   ").unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }

    #[test]
    fn description_drops_blank() {
        assert_eq!(description(Some("  ".into())), None);
        assert_eq!(description(None), None);
        assert_eq!(description(Some(" spicy ".into())), Some("spicy".into()));
    }

    #[test]
    fn numeric_bounds() {
        assert!(non_negative(0.0, "Fat").is_ok());
        assert_eq!(
            non_negative(-0.5, "Fat").unwrap_err().to_string(),
            "Fat must be a positive number"
        );
        assert!(non_negative(f64::NAN, "Fat").is_err());
        assert!(grams(0.1, "Weight").is_ok());
        assert!(grams(0.05, "Weight").is_err());
        assert!(grams(f64::INFINITY, "Weight").is_err());
    }
}
