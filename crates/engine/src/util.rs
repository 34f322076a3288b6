//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Trim a required name, rejecting blank input.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim free text; blank input collapses to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Trim a free-text label. Labels may be empty.
pub(crate) fn normalize_label(value: &str) -> String {
    value.trim().to_string()
}

/// Stock quantities, prices and yields: finite and `>= 0`.
pub(crate) fn validate_non_negative(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be a number >= 0"
        )));
    }
    Ok(value)
}

/// Markups, link quantities and batches: finite and `> 0`.
pub(crate) fn validate_positive(value: f64, label: &str) -> ResultEngine<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be a number > 0"
        )));
    }
    Ok(value)
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::KeyNotFound(format!("{label} not exists")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_name_is_trimmed() {
        assert_eq!(
            normalize_required_name("  Flour ", "ingredient").unwrap(),
            "Flour"
        );
    }

    #[test]
    fn blank_required_name_is_rejected() {
        assert_eq!(
            normalize_required_name("   ", "recipe"),
            Err(EngineError::InvalidName(
                "recipe name must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn optional_text_collapses_blank() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" soft ")),
            Some("soft".to_string())
        );
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(validate_non_negative(0.0, "price").unwrap(), 0.0);
        assert!(validate_non_negative(-0.5, "price").is_err());
        assert!(validate_non_negative(f64::NAN, "price").is_err());
        assert!(validate_non_negative(f64::INFINITY, "price").is_err());
    }

    #[test]
    fn positive_rejects_zero() {
        assert!(validate_positive(0.0, "markup").is_err());
        assert_eq!(validate_positive(2.5, "markup").unwrap(), 2.5);
    }

    #[test]
    fn parse_uuid_maps_to_not_found() {
        assert_eq!(
            parse_uuid("nope", "recipe"),
            Err(EngineError::KeyNotFound("recipe not exists".to_string()))
        );
    }
}
