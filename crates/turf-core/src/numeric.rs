//! # Numeric Input Module
//!
//! Forgiving conversion of user-typed numbers into decimals.
//!
//! ## Coercion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input (from the editing surface)          Decimal                      │
//! │  ────────────────────────────────          ───────                      │
//! │  "12.5"                                    12.5                         │
//! │  "  7 "                                    7                            │
//! │  "12abc"                                   12     (leading number)      │
//! │  "1e3"                                     1000                         │
//! │  ""  /  "abc"  /  null  /  missing         0                            │
//! │  12.5 (JSON number)                        12.5                         │
//! │                                                                         │
//! │  NOTHING here returns an error. Strict checks belong to the form layer │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Parses a user-typed number, returning zero for anything unparseable.
///
/// Accepts the longest leading numeric prefix: optional sign, digits, one
/// decimal point and an optional exponent. Values outside the decimal range
/// also become zero.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use turf_core::numeric::parse_decimal;
///
/// assert_eq!(parse_decimal("12.50"), Decimal::new(1250, 2));
/// assert_eq!(parse_decimal("3 m²"), Decimal::from(3));
/// assert_eq!(parse_decimal("n/a"), Decimal::ZERO);
/// ```
pub fn parse_decimal(input: &str) -> Decimal {
    let prefix = numeric_prefix(input.trim());
    if prefix.is_empty() {
        return Decimal::ZERO;
    }

    // ".5" and "-.5" need an explicit leading zero
    let (sign, unsigned) = match prefix.as_bytes()[0] {
        b'-' => ("-", &prefix[1..]),
        b'+' => ("", &prefix[1..]),
        _ => ("", prefix),
    };
    let normalized = if unsigned.starts_with('.') {
        format!("{sign}0{unsigned}")
    } else {
        format!("{sign}{unsigned}")
    };

    if normalized.contains(['e', 'E']) {
        return Decimal::from_scientific(&normalized.to_ascii_lowercase()).unwrap_or(Decimal::ZERO);
    }

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Returns the longest prefix of `s` that reads as a number.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if digits > 0 {
        end = i;
    }

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let mut fraction = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            fraction += 1;
        }
        if fraction > 0 || digits > 0 {
            digits += fraction;
            end = i;
        }
    }

    if digits == 0 {
        return "";
    }

    // Exponent only counts when it carries at least one digit
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    // Decimal::from_str rejects "5." and ".5" is fine; trim a dangling point
    s[..end].trim_end_matches('.')
}

/// Converts a binary float, mapping NaN and infinities to zero.
pub fn decimal_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Serde Integration
// =============================================================================

/// Any JSON value the editing surface may send for a numeric field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl NumericInput {
    /// Coerces to a decimal, zero when malformed.
    pub fn to_decimal(&self) -> Decimal {
        match self {
            NumericInput::Integer(n) => Decimal::from(*n),
            NumericInput::Float(f) => decimal_from_f64(*f),
            NumericInput::Text(s) => parse_decimal(s),
            NumericInput::Other(_) => Decimal::ZERO,
        }
    }
}

/// `deserialize_with` helper: accepts string, number, null or garbage.
///
/// Pair with `#[serde(default)]` so a missing field also becomes zero.
///
/// ## Usage
/// ```rust
/// use rust_decimal::Decimal;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(default, deserialize_with = "turf_core::numeric::lenient")]
///     quantity: Decimal,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"quantity": "4,5"}"#).unwrap();
/// assert_eq!(row.quantity, Decimal::from(4));
/// ```
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<NumericInput>::deserialize(deserializer)?;
    Ok(input.map(|i| i.to_decimal()).unwrap_or(Decimal::ZERO))
}

// =============================================================================
// Unit Tests
// =============================================================================
