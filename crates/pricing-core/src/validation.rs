//! # Validation Module
//!
//! Request and configuration validation for the pricing pipeline.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Request Guard                                      │
//! │                                                                         │
//! │  OrderRequest                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_request() ← THIS MODULE                                      │
//! │       ├── region blank?       → Required { "region" }                   │
//! │       ├── lines empty?        → Required { "lines" }                    │
//! │       └── any qty <= 0?       → MustBePositive { "lines[i].qty" }       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Catalog / Inventory / Tax collaborators                                │
//! │                                                                         │
//! │  Nothing below this line runs when validation fails.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation is pure: validating the same request twice yields the same
//! outcome.
//!
//! ## Usage
//! ```rust
//! use pricing_core::types::{Line, OrderRequest};
//! use pricing_core::validation::validate_request;
//!
//! let request = OrderRequest::new("JP", vec![Line::new("A", 1)]);
//! assert!(validate_request(&request).is_ok());
//!
//! let blank_region = OrderRequest::new("  ", vec![Line::new("A", 1)]);
//! assert!(validate_request(&blank_region).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{Line, OrderRequest, Rate};

// =============================================================================
// Request Validators
// =============================================================================

/// Validates a whole order request: region, then lines, then quantities.
pub fn validate_request(request: &OrderRequest) -> ValidationResult<()> {
    validate_region(&request.region)?;
    validate_lines(&request.lines)?;
    Ok(())
}

/// Validates the tax region identifier.
///
/// ## Rules
/// - Must not be empty or whitespace-only
pub fn validate_region(region: &str) -> ValidationResult<()> {
    if region.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "region".to_string(),
        });
    }

    Ok(())
}

/// Validates the line list.
///
/// ## Rules
/// - At least one line
/// - Every quantity strictly positive
pub fn validate_lines(lines: &[Line]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    for (index, line) in lines.iter().enumerate() {
        validate_quantity(index, line.qty)?;
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(index: usize, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: format!("lines[{}].qty", index),
        });
    }

    Ok(())
}

// =============================================================================
// Configuration Validators
// =============================================================================

/// Validates a rate is a fraction in `[0, 1]`.
///
/// ## Example
/// ```rust
/// use pricing_core::types::Rate;
/// use pricing_core::validation::validate_rate;
///
/// assert!(validate_rate("cap.rate", Rate::from_percent(30)).is_ok());
/// assert!(validate_rate("cap.rate", Rate::from_percent(130)).is_err());
/// ```
pub fn validate_rate(field: &str, rate: Rate) -> ValidationResult<()> {
    let value = rate.value();
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ValidationError::InvalidRate {
            field: field.to_string(),
            value,
        });
    }

    Ok(())
}

/// Validates an amount is not negative (unit prices, thresholds).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a count threshold is at least one.
pub fn validate_min_count(field: &str, count: u64) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn request(region: &str, lines: Vec<Line>) -> OrderRequest {
        OrderRequest::new(region, lines)
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("   ")]
    #[case("\t")]
    #[case("\n")]
    fn test_blank_region_is_required(#[case] region: &str) {
        let err = validate_request(&request(region, vec![Line::new("P01", 5)])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Required {
                field: "region".to_string()
            }
        );
    }

    #[test]
    fn test_empty_lines_are_required() {
        let err = validate_request(&request("JP", vec![])).unwrap_err();
        assert_eq!(err.to_string(), "lines is required");
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    #[case(i64::MIN)]
    fn test_non_positive_qty_is_rejected(#[case] qty: i64) {
        let lines = vec![Line::new("A", 1), Line::new("B", qty)];
        let err = validate_request(&request("JP", lines)).unwrap_err();
        assert_eq!(err.to_string(), "lines[1].qty must be positive");
    }

    #[test]
    fn test_region_is_checked_before_lines() {
        let err = validate_request(&request("", vec![])).unwrap_err();
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let good = request("JP", vec![Line::new("A", 1)]);
        assert_eq!(validate_request(&good), validate_request(&good));

        let bad = request("JP", vec![Line::new("A", 0)]);
        assert_eq!(validate_request(&bad), validate_request(&bad));
        assert!(validate_request(&bad).is_err());
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("r", Rate::zero()).is_ok());
        assert!(validate_rate("r", Rate::from_percent(100)).is_ok());
        assert!(validate_rate("r", Rate::from_percent(101)).is_err());
        assert!(validate_rate("r", Rate::new(Decimal::new(-1, 2))).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("price", Money::zero()).is_ok());
        assert!(validate_non_negative("price", Money::from_major(-1)).is_err());
    }

    #[test]
    fn test_validate_min_count() {
        assert!(validate_min_count("min_qty", 1).is_ok());
        assert!(validate_min_count("min_qty", 0).is_err());
    }
}
