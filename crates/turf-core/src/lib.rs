//! # turf-core: Pure Quotation Logic for Turf Quote
//!
//! This crate is the **heart** of Turf Quote. It turns the line items, cost
//! entries and discount of a commercial quotation into a complete financial
//! breakdown, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Turf Quote Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Editing Surface (outside this workspace)           │   │
//! │  │    Item rows ──► Cost rows ──► Discount ──► Summary / PDF       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ QuoteInput / DraftEdit                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ turf-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ aggregate │  │ breakdown │  │commission │  │visibility │  │   │
//! │  │   │ items     │  │ tax/tithe │  │ per-seller│  │ admin vs  │  │   │
//! │  │   │ costs     │  │ discount  │  │ reporting │  │ seller    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    turf-db (Database Layer)                     │   │
//! │  │              SQLite queries, schema, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` and `Percent` over `rust_decimal::Decimal`
//! - [`numeric`] - Forgiving numeric input (malformed values become zero)
//! - [`types`] - Domain types (LineItem, CostEntry, Quotation, Salesperson)
//! - [`aggregate`] - Line item and cost reductions
//! - [`breakdown`] - The financial derivation pipeline
//! - [`commission`] - Commission amounts and approved-quote reporting
//! - [`visibility`] - Role-based projection of a breakdown
//! - [`draft`] - Immutable editing revisions
//! - [`validation`] - Boundary validation for the form/storage layer
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use turf_core::{compute_breakdown, LineItem, Percent};
//!
//! let items = vec![LineItem::new("GRASS-40", "Synthetic grass 40mm", 10, 2, 5)];
//! let breakdown = compute_breakdown(&items, &[], Percent::zero());
//!
//! assert_eq!(breakdown.gross_revenue.amount(), Decimal::from(50));
//! assert_eq!(breakdown.product_cost.amount(), Decimal::from(20));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod breakdown;
pub mod commission;
pub mod draft;
pub mod error;
pub mod money;
pub mod numeric;
pub mod types;
pub mod validation;
pub mod visibility;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use aggregate::{aggregate_costs, aggregate_line_items, LineTotals};
pub use breakdown::{compute_breakdown, FinancialBreakdown, QuoteInput};
pub use commission::{commission_amount, summarize_commissions, CommissionReport};
pub use draft::{DraftEdit, DraftSession, QuoteDraft};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use types::*;
pub use visibility::{BreakdownView, LineItemView, QuotationView};

// =============================================================================
// Crate-Level Constants
// =============================================================================

use rust_decimal::Decimal;

/// Invoice (tax) rate charged on gross revenue: 5%.
pub const INVOICE_RATE: Percent = Percent::from_decimal(Decimal::from_parts(5, 0, 0, false, 0));

/// Tithe rate taken from company profit: 10%.
pub const TITHE_RATE: Percent = Percent::from_decimal(Decimal::from_parts(10, 0, 0, false, 0));

/// Width of the zero-padded quotation sequence number (`#007`).
pub const QUOTE_NUMBER_WIDTH: usize = 3;
