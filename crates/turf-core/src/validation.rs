//! # Validation Module
//!
//! Input validation for the form and storage boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Editing surface                                              │
//! │  ├── Keystroke-level feedback                                          │
//! │  └── Calls the engine on every edit: NO validation, garbage → 0        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Save (turf-db QuotationRepository::create / update)          │
//! │  └── THIS MODULE: header and range checks before anything is stored    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine applies whatever discount it is given. Clamping, when wanted,
//! happens here with [`clamp_discount_percent`].

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Percent;
use crate::types::{CalculationMode, NewQuotation};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 4000;

// =============================================================================
// Percentages
// =============================================================================

fn validate_percent(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }
    Ok(())
}

/// Validates a discount percentage.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use turf_core::validation::validate_discount_percent;
///
/// assert!(validate_discount_percent(Decimal::from(10)).is_ok());
/// assert!(validate_discount_percent(Decimal::from(101)).is_err());
/// ```
pub fn validate_discount_percent(value: Decimal) -> ValidationResult<()> {
    validate_percent("discount", value)
}

/// Clamps a discount into 0..=100 for callers that want a strict contract.
pub fn clamp_discount_percent(value: Decimal) -> Percent {
    Percent::from_decimal(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
}

/// Validates a salesperson's commission percentage.
pub fn validate_commission_percent(value: Decimal) -> ValidationResult<()> {
    validate_percent("commission", value)
}

/// Validates a cost entry's percentage value.
pub fn validate_cost_percentage(value: Decimal) -> ValidationResult<()> {
    validate_percent("cost percentage", value)
}

// =============================================================================
// Header Fields
// =============================================================================

fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<()> {
    match value {
        Some(text) if text.chars().count() > MAX_TEXT_LEN => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        }),
        _ => Ok(()),
    }
}

/// Validates the customer reference and name on a quotation.
pub fn validate_customer_reference(id: &str, name: &str) -> ValidationResult<()> {
    validate_required("customer", id, MAX_NAME_LEN)?;
    validate_required("customer name", name, MAX_NAME_LEN)
}

/// Validates the responsible salesperson reference.
pub fn validate_responsible(id: &str, name: &str) -> ValidationResult<()> {
    validate_required("responsible", id, MAX_NAME_LEN)?;
    validate_required("responsible name", name, MAX_NAME_LEN)
}

/// Validates a salesperson's display name.
pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    validate_required("name", name, MAX_NAME_LEN)
}

/// Validates a whole quotation before it is saved.
///
/// ## Rules
/// - Customer and responsible person are required
/// - Discount and percentage-mode cost percentages are within 0..=100
/// - Free-text fields stay under 4000 characters
///
/// Line values are not range-checked: negative quantities model returns.
pub fn validate_new_quotation(quote: &NewQuotation) -> ValidationResult<()> {
    let header = &quote.header;

    validate_customer_reference(&header.customer_id, &header.customer_name)?;
    validate_responsible(&header.responsible_id, &header.responsible_name)?;
    validate_optional_text("notes", header.notes.as_deref())?;
    validate_optional_text("shipping terms", header.shipping_terms.as_deref())?;
    validate_optional_text("warranty terms", header.warranty_terms.as_deref())?;
    validate_discount_percent(quote.discount_percent)?;

    // Fixed entries ignore percentage_value, whatever it holds
    for cost in &quote.costs {
        if cost.calculation_mode == CalculationMode::Percentage {
            validate_cost_percentage(cost.percentage_value)?;
        }
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use turf_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
