//! # Error Types
//!
//! Domain-specific error types for turf-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  turf-core errors (this file)                                          │
//! │  ├── CoreError        - Editing and lifecycle errors                   │
//! │  └── ValidationError  - Boundary validation failures                   │
//! │                                                                         │
//! │  turf-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError / DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculation engine itself has no error type: malformed numbers become
//! zero and division by zero is defined. These errors come from the layers
//! around it.

use thiserror::Error;

use crate::types::QuoteStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An edit referenced a line that does not exist in the draft.
    ///
    /// ## When This Occurs
    /// - The editing surface sent a stale row index
    /// - Two tabs edited the same draft and one removed the row
    #[error("No {kind} at position {index} (draft has {len})")]
    LineNotFound {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// Status change not allowed from the current status.
    ///
    /// ## When This Occurs
    /// - Approving a quotation that was already rejected
    /// - Rejecting a quotation that was already approved
    #[error("Quotation {number} is {from}, cannot become {to}")]
    InvalidStatusTransition {
        number: String,
        from: QuoteStatus,
        to: QuoteStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by [`crate::validation`] at the form/storage boundary, never by the
/// calculation engine.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::LineNotFound {
            kind: "item",
            index: 3,
            len: 2,
        };
        assert_eq!(err.to_string(), "No item at position 3 (draft has 2)");

        let err = CoreError::InvalidStatusTransition {
            number: "#004".to_string(),
            from: QuoteStatus::Rejected,
            to: QuoteStatus::Approved,
        };
        assert_eq!(err.to_string(), "Quotation #004 is rejected, cannot become approved");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer".to_string(),
        };
        assert_eq!(err.to_string(), "customer is required");

        let err = ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        };
        assert_eq!(err.to_string(), "discount must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
