//! # Validation Module
//!
//! Input validation for Atelier requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  ├── JSON shape (deserialization)                                      │
//! │  └── THIS MODULE: field rules, defaults, date parsing                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Order engine (atelier-db)                                    │
//! │  └── Re-checks order lines before opening a transaction                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (stock >= 0) constraints                         │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use atelier_core::validation::{validate_quantity, parse_threshold};
//!
//! validate_quantity(5).unwrap();
//! assert_eq!(parse_threshold(Some("abc")), 5);
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::ValidationError;
use crate::types::{ArtisanDraft, ArtisanInput, OrderLine, ProductDraft, ProductInput};
use crate::DEFAULT_LOW_STOCK_THRESHOLD;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required display name.
///
/// The name must be present and non-empty. It is stored exactly as given.
///
/// ## Example
/// ```rust
/// use atelier_core::validation::validate_name;
///
/// assert_eq!(validate_name(Some("Oak Bowl")).unwrap(), "Oak Bowl");
/// assert!(validate_name(Some("")).is_err());
/// assert!(validate_name(None).is_err());
/// ```
pub fn validate_name(name: Option<&str>) -> ValidationResult<String> {
    match name {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(ValidationError::Required {
            field: "name".to_string(),
        }),
    }
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates artisan input and applies defaults.
///
/// An absent `lead_time_days` becomes `0`, the same value as an explicit
/// zero.
pub fn validate_artisan(input: ArtisanInput) -> ValidationResult<ArtisanDraft> {
    let name = validate_name(input.name.as_deref())?;

    Ok(ArtisanDraft {
        name,
        contact_info: input.contact_info,
        craft_types: input.craft_types,
        lead_time_days: input.lead_time_days.unwrap_or(0),
    })
}

/// Validates product input and applies defaults.
///
/// ## Rules
/// - `name` is required
/// - `stock` must be >= 0 when given (defaults to 0)
/// - `cost` and `price` default to 0
/// - `artisan_id` of 0 means "no artisan"
///
/// ## Example
/// ```rust
/// use atelier_core::{ProductInput, validation::validate_product};
///
/// let input = ProductInput {
///     name: Some("Vase".into()),
///     stock: Some(-1),
///     ..Default::default()
/// };
/// assert!(validate_product(input).is_err());
/// ```
pub fn validate_product(input: ProductInput) -> ValidationResult<ProductDraft> {
    let name = validate_name(input.name.as_deref())?;

    let stock = input.stock.unwrap_or(0);
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(ProductDraft {
        name,
        category: input.category,
        artisan_id: input.artisan_id.filter(|id| *id != 0),
        cost: input.cost.unwrap_or(0.0),
        price: input.price.unwrap_or(0.0),
        stock,
    })
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates the lines of a new order.
///
/// ## Rules
/// - At least one line
/// - Every quantity is positive
///
/// Repeated product ids are allowed; each line is checked against stock on
/// its own.
pub fn validate_order_lines(lines: &[OrderLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for line in lines {
        validate_quantity(line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Report Parameters
// =============================================================================

/// Parses the low-stock threshold query parameter.
///
/// Reads the leading decimal integer, so `"12abc"` is 12 and `"3.7"` is 3.
/// Missing, non-numeric and zero values all fall back to
/// [`DEFAULT_LOW_STOCK_THRESHOLD`].
pub fn parse_threshold(raw: Option<&str>) -> i64 {
    raw.and_then(leading_integer)
        .filter(|n| *n != 0)
        .unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD)
}

/// Optional sign followed by ASCII digits, after leading whitespace.
fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let sign = usize::from(s.starts_with(['+', '-']));
    let end = s[sign..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + sign);
    s[..end].parse().ok()
}

/// Parses a report boundary date.
///
/// ## Accepted Formats
/// ```text
/// 2026-03-01T10:00:00Z        RFC 3339 (any offset, converted to UTC)
/// 2026-03-01T10:00:00         naive, taken as UTC
/// 2026-03-01 10:00:00         naive, taken as UTC
/// 2026-03-01                  midnight UTC
/// ```
pub fn parse_report_date(field: &str, raw: Option<&str>) -> ValidationResult<DateTime<Utc>> {
    let raw = raw.map(str::trim).unwrap_or_default();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected an ISO 8601 date".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name(Some("Test Artisan")).unwrap(), "Test Artisan");
        assert!(validate_name(Some("")).is_err());
        assert!(validate_name(None).is_err());

        let long = "A".repeat(300);
        assert_eq!(validate_name(Some(&long)).unwrap(), long);
        assert_eq!(validate_name(Some(" Bowl ")).unwrap(), " Bowl ");
    }

    #[test]
    fn test_validate_artisan_defaults_lead_time() {
        let draft = validate_artisan(ArtisanInput {
            name: Some("Test Artisan".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(draft.lead_time_days, 0);

        let draft = validate_artisan(ArtisanInput {
            name: Some("Test Artisan".into()),
            lead_time_days: Some(7),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(draft.lead_time_days, 7);
    }

    #[test]
    fn test_validate_artisan_requires_name() {
        let err = validate_artisan(ArtisanInput::default()).unwrap_err();
        assert!(matches!(err, ValidationError::Required { .. }));
    }

    #[test]
    fn test_validate_product_defaults() {
        let draft = validate_product(ProductInput {
            name: Some("Vase".into()),
            artisan_id: Some(0),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(draft.artisan_id, None);
        assert_eq!(draft.cost, 0.0);
        assert_eq!(draft.price, 0.0);
        assert_eq!(draft.stock, 0);
    }

    #[test]
    fn test_validate_product_rejects_negative_stock() {
        let err = validate_product(ProductInput {
            name: Some("Vase".into()),
            stock: Some(-1),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));

        assert!(validate_product(ProductInput {
            name: Some("Vase".into()),
            stock: Some(0),
            ..Default::default()
        })
        .is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_order_lines() {
        assert!(validate_order_lines(&[]).is_err());
        assert!(validate_order_lines(&[OrderLine { product_id: 1, quantity: 0 }]).is_err());

        // Same product twice is accepted here; stock decides later.
        let lines = [
            OrderLine { product_id: 1, quantity: 2 },
            OrderLine { product_id: 1, quantity: 3 },
        ];
        assert!(validate_order_lines(&lines).is_ok());
    }

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold(None), 5);
        assert_eq!(parse_threshold(Some("abc")), 5);
        assert_eq!(parse_threshold(Some("0")), 5);
        assert_eq!(parse_threshold(Some("12")), 12);
        assert_eq!(parse_threshold(Some(" 12abc")), 12);
        assert_eq!(parse_threshold(Some("3.7")), 3);
        assert_eq!(parse_threshold(Some("-2")), -2);
        assert_eq!(parse_threshold(Some("-")), 5);
        assert_eq!(parse_threshold(Some("")), 5);
    }

    #[test]
    fn test_parse_report_date_formats() {
        let dt = parse_report_date("start", Some("2026-03-01")).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2026, 3, 1, 0));

        let dt = parse_report_date("start", Some("2026-03-01 10:30:00")).unwrap();
        assert_eq!(dt.hour(), 10);

        let dt = parse_report_date("start", Some("2026-03-01T10:30:00+02:00")).unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn test_parse_report_date_rejects_garbage() {
        assert!(matches!(
            parse_report_date("end", Some("not-a-date")),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_report_date("end", None),
            Err(ValidationError::Required { .. })
        ));
    }
}
