//! # Repository Module
//!
//! Database repository implementations for Turf Quote.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Web handler                                                           │
//! │       │                                                                 │
//! │       │  db.quotations().create(&new_quotation)                        │
//! │       ▼                                                                 │
//! │  QuotationRepository                                                   │
//! │  ├── create / update      → validate, compute_breakdown, write         │
//! │  ├── get_by_id / get_by_number / list / list_by_status                 │
//! │  └── update_status / delete / count                                    │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`QuotationRepository`](quotation::QuotationRepository) - Quotations with lines and costs
//! - [`SalespersonRepository`](salesperson::SalespersonRepository) - Staff and commission rates

pub mod quotation;
pub mod salesperson;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// Parses a decimal TEXT column.
pub(crate) fn decimal_column(column: &str, raw: &str) -> DbResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|_| DbError::invalid_data(column, raw))
}

/// Fixed-width RFC 3339 text so timestamp columns sort chronologically.
pub(crate) fn timestamp_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses an RFC 3339 TEXT timestamp column.
pub(crate) fn timestamp_column(column: &str, raw: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DbError::invalid_data(column, raw))
}
