//! # Domain Types
//!
//! Core domain types used throughout Turf Quote.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Quotation     │   │    LineItem     │   │   CostEntry     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  product ref    │   │  reference      │       │
//! │  │  number (#007)  │   │  quantity       │   │  mode           │       │
//! │  │  header         │   │  unit_cost      │   │  unit_value     │       │
//! │  │  breakdown      │   │  unit_sale_price│   │  quantity / %   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  QuoteStatus    │   │ CalculationMode │   │     Role        │       │
//! │  │  Pending        │   │  Fixed          │   │  Admin          │       │
//! │  │  Approved       │   │  Percentage     │   │  Salesperson    │       │
//! │  │  Rejected       │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A quotation has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `number`: `#NNN` - human-readable, printed on the client document

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::breakdown::FinancialBreakdown;
use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percent};
use crate::numeric::lenient;
use crate::QUOTE_NUMBER_WIDTH;

// =============================================================================
// Line Item
// =============================================================================

/// A product line on a quotation.
///
/// Product details are a snapshot taken when the line is added, so editing
/// the product catalogue later does not rewrite old quotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product ID or code in the catalogue.
    #[serde(default)]
    pub product_reference: String,

    /// Product name at the time the line was added (frozen).
    #[serde(default)]
    pub product_name: String,

    /// Quantity (m², units, rolls...).
    #[serde(default, deserialize_with = "lenient")]
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Acquisition cost per unit.
    #[serde(default, deserialize_with = "lenient")]
    #[ts(type = "string")]
    pub unit_cost: Decimal,

    /// Price charged to the customer per unit.
    #[serde(default, deserialize_with = "lenient")]
    #[ts(type = "string")]
    pub unit_sale_price: Decimal,
}

impl LineItem {
    /// Creates a line item.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use turf_core::LineItem;
    ///
    /// let item = LineItem::new("GRASS-40", "Synthetic grass 40mm", 10, 2, 5);
    /// assert_eq!(item.line_revenue().amount(), Decimal::from(50));
    /// assert_eq!(item.line_cost().amount(), Decimal::from(20));
    /// ```
    pub fn new(
        product_reference: impl Into<String>,
        product_name: impl Into<String>,
        quantity: impl Into<Decimal>,
        unit_cost: impl Into<Decimal>,
        unit_sale_price: impl Into<Decimal>,
    ) -> Self {
        LineItem {
            product_reference: product_reference.into(),
            product_name: product_name.into(),
            quantity: quantity.into(),
            unit_cost: unit_cost.into(),
            unit_sale_price: unit_sale_price.into(),
        }
    }

    /// `quantity * unit_sale_price`.
    #[inline]
    pub fn line_revenue(&self) -> Money {
        Money::new(self.unit_sale_price) * self.quantity
    }

    /// `quantity * unit_cost`.
    #[inline]
    pub fn line_cost(&self) -> Money {
        Money::new(self.unit_cost) * self.quantity
    }
}

// =============================================================================
// Cost Entry
// =============================================================================

/// How a cost entry turns its inputs into a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMode {
    /// `unit_value * quantity`.
    #[default]
    Fixed,
    /// `unit_value * percentage_value / 100`.
    Percentage,
}

/// An extra cost attached to a quotation (freight, installation, labour...).
///
/// `total_value()` is derived on every read, so changing the unit value,
/// quantity, mode or percentage is always reflected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostEntry {
    /// Cost item ID in the cost catalogue.
    #[serde(default)]
    pub reference: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub calculation_mode: CalculationMode,

    #[serde(default, deserialize_with = "lenient")]
    #[ts(type = "string")]
    pub unit_value: Decimal,

    /// Used only in `Fixed` mode.
    #[serde(default, deserialize_with = "lenient")]
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Used only in `Percentage` mode, 0 to 100.
    #[serde(default, deserialize_with = "lenient")]
    #[ts(type = "string")]
    pub percentage_value: Decimal,
}

impl CostEntry {
    /// A fixed cost: `unit_value * quantity`.
    pub fn fixed(
        reference: impl Into<String>,
        name: impl Into<String>,
        unit_value: impl Into<Decimal>,
        quantity: impl Into<Decimal>,
    ) -> Self {
        CostEntry {
            reference: reference.into(),
            name: name.into(),
            calculation_mode: CalculationMode::Fixed,
            unit_value: unit_value.into(),
            quantity: quantity.into(),
            percentage_value: Decimal::ZERO,
        }
    }

    /// A percentage cost: `unit_value * percentage_value / 100`.
    pub fn percentage(
        reference: impl Into<String>,
        name: impl Into<String>,
        unit_value: impl Into<Decimal>,
        percentage_value: impl Into<Decimal>,
    ) -> Self {
        CostEntry {
            reference: reference.into(),
            name: name.into(),
            calculation_mode: CalculationMode::Percentage,
            unit_value: unit_value.into(),
            quantity: Decimal::ZERO,
            percentage_value: percentage_value.into(),
        }
    }

    /// The entry's contribution to total costs.
    ///
    /// In `Percentage` mode the percentage applies to the entry's own unit
    /// value, not to the quotation revenue.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use turf_core::CostEntry;
    ///
    /// let freight = CostEntry::fixed("FRT", "Freight", 100, 3);
    /// assert_eq!(freight.total_value().amount(), Decimal::from(300));
    ///
    /// let insurance = CostEntry::percentage("INS", "Insurance", 200, 10);
    /// assert_eq!(insurance.total_value().amount(), Decimal::from(20));
    /// ```
    pub fn total_value(&self) -> Money {
        let unit = Money::new(self.unit_value);
        match self.calculation_mode {
            CalculationMode::Fixed => unit * self.quantity,
            CalculationMode::Percentage => Percent::from_decimal(self.percentage_value).of(unit),
        }
    }
}

// =============================================================================
// Quote Status
// =============================================================================

/// Commercial status of a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    /// Sent to the customer, awaiting an answer.
    #[default]
    Pending,
    /// Accepted by the customer. Counts towards commission.
    Approved,
    /// Declined by the customer.
    Rejected,
}

impl QuoteStatus {
    /// Lowercase name, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Rejected => "rejected",
        }
    }

    /// Whether a quotation may move from `self` to `next`.
    ///
    /// ```text
    /// Pending ──► Approved ──► Pending (reopen)
    ///    └─────► Rejected ──► Pending (reopen)
    /// Approved ◄─╳─► Rejected
    /// ```
    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        use QuoteStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Pending, _) => true,
            (_, Pending) => true,
            _ => false,
        }
    }

    /// Returns `next` if quotation `number` may move there from `self`.
    ///
    /// ## Example
    /// ```rust
    /// use turf_core::QuoteStatus;
    ///
    /// assert!(QuoteStatus::Pending.transition("#001", QuoteStatus::Approved).is_ok());
    /// assert!(QuoteStatus::Approved.transition("#001", QuoteStatus::Rejected).is_err());
    /// ```
    pub fn transition(self, number: &str, next: QuoteStatus) -> CoreResult<QuoteStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoreError::InvalidStatusTransition {
                number: number.to_string(),
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Roles & Viewers
// =============================================================================

/// Privilege level of the person looking at a quotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sees costs, invoice, profit and tithe.
    Admin,
    /// Sees revenue, discount and their own commission only.
    #[default]
    Salesperson,
}

impl Role {
    /// Whether this role may see cost and profit figures.
    #[inline]
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The authenticated caller, as supplied by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub user_id: String,
    pub display_name: String,
    pub role: Role,
    /// Commission the viewer earns on their own quotations.
    pub commission_percent: Percent,
}

impl Viewer {
    pub fn admin(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Viewer {
            user_id: user_id.into(),
            display_name: display_name.into(),
            role: Role::Admin,
            commission_percent: Percent::zero(),
        }
    }

    pub fn salesperson(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        commission_percent: Percent,
    ) -> Self {
        Viewer {
            user_id: user_id.into(),
            display_name: display_name.into(),
            role: Role::Salesperson,
            commission_percent,
        }
    }
}

impl From<&Salesperson> for Viewer {
    fn from(person: &Salesperson) -> Self {
        Viewer {
            user_id: person.id.clone(),
            display_name: person.name.clone(),
            role: person.role,
            commission_percent: person.commission_percent,
        }
    }
}

// =============================================================================
// Salesperson
// =============================================================================

/// A staff member who can be responsible for quotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Salesperson {
    pub id: String,
    pub name: String,
    pub role: Role,
    /// Commission on approved quotation totals (5 = 5%).
    #[ts(type = "string")]
    pub commission_percent: Percent,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Quotation
// =============================================================================

/// Commercial header of a quotation: everything except the numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuotationHeader {
    pub customer_id: String,
    pub customer_name: String,
    #[ts(as = "Option<String>")]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub status: QuoteStatus,
    pub notes: Option<String>,
    pub shipping_terms: Option<String>,
    pub warranty_terms: Option<String>,
    /// Salesperson responsible for the deal (commission owner).
    pub responsible_id: String,
    /// Responsible person's name at the time of saving (frozen).
    pub responsible_name: String,
}

/// Input for creating or replacing a quotation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuotation {
    pub header: QuotationHeader,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub costs: Vec<CostEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub discount_percent: Decimal,
}

impl NewQuotation {
    /// Runs the calculation engine over this input.
    ///
    /// The discount is taken at two decimal places, the precision it is
    /// stored with, so the saved discount amount matches the saved percent.
    pub fn breakdown(&self) -> FinancialBreakdown {
        let discount = Percent::from_decimal(crate::money::round_for_display(self.discount_percent));
        crate::compute_breakdown(&self.items, &self.costs, discount)
    }
}

/// A saved quotation with its breakdown snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub id: String,
    /// Human-readable sequence number, e.g. `#007`.
    pub number: String,
    pub header: QuotationHeader,
    pub items: Vec<LineItem>,
    pub costs: Vec<CostEntry>,
    /// Snapshot taken at save time.
    pub breakdown: FinancialBreakdown,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    /// Amount the customer pays, the commission base.
    #[inline]
    pub fn total(&self) -> Money {
        self.breakdown.final_total
    }

    /// Light summary used by commission reporting.
    pub fn summary(&self) -> QuotationSummary {
        QuotationSummary {
            id: self.id.clone(),
            number: self.number.clone(),
            status: self.header.status,
            responsible_id: self.header.responsible_id.clone(),
            final_total: self.breakdown.final_total,
        }
    }
}

/// The parts of a quotation that reporting needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationSummary {
    pub id: String,
    pub number: String,
    pub status: QuoteStatus,
    pub responsible_id: String,
    pub final_total: Money,
}

/// Formats a quotation sequence number: `#001`, `#042`, `#1234`.
///
/// ## Example
/// ```rust
/// use turf_core::quote_number;
///
/// assert_eq!(quote_number(7), "#007");
/// assert_eq!(quote_number(1234), "#1234");
/// ```
pub fn quote_number(sequence: i64) -> String {
    format!("#{:0width$}", sequence, width = QUOTE_NUMBER_WIDTH)
}

/// Sequence number assigned to the next quotation: `count(existing) + 1`.
pub fn next_quote_number(existing: i64) -> String {
    quote_number(existing + 1)
}

// =============================================================================
// Unit Tests
// =============================================================================
