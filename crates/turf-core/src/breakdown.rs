//! # Financial Breakdown
//!
//! The derivation pipeline from revenue and costs to profit, tithe and the
//! amount the customer pays.
//!
//! ## Pipeline Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross_revenue, total_costs                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invoice_amount     = gross_revenue × 5%                               │
//! │  total_with_invoice = total_costs + invoice_amount                     │
//! │  company_profit     = gross_revenue − total_with_invoice               │
//! │  profit_percent     = company_profit / gross_revenue × 100  (0 if ÷0)  │
//! │  tithe              = company_profit × 10%                             │
//! │  net_profit         = company_profit − tithe                           │
//! │                                                                         │
//! │  Independent branch (customer-facing):                                 │
//! │  discount_amount    = gross_revenue × discount%                        │
//! │  final_total        = gross_revenue − discount_amount                  │
//! │                                                                         │
//! │  The discount never reduces company_profit, tithe or net_profit.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value is recomputed from scratch on each call; nothing is carried
//! over between revisions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::aggregate::{aggregate_line_items, total_costs};
use crate::money::{Money, Percent};
use crate::numeric::lenient;
use crate::types::{CostEntry, LineItem};
use crate::{INVOICE_RATE, TITHE_RATE};

/// Complete financial picture of a quotation.
///
/// Derived only. Build it with [`compute_breakdown`] or
/// [`FinancialBreakdown::derive`]; never patch fields by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinancialBreakdown {
    #[ts(type = "string")]
    pub gross_revenue: Money,
    #[ts(type = "string")]
    pub product_cost: Money,
    /// Product cost plus every cost entry.
    #[ts(type = "string")]
    pub total_costs: Money,
    #[ts(type = "string")]
    pub invoice_rate: Percent,
    #[ts(type = "string")]
    pub invoice_amount: Money,
    #[ts(type = "string")]
    pub total_with_invoice: Money,
    #[ts(type = "string")]
    pub company_profit: Money,
    #[ts(type = "string")]
    pub profit_percent: Decimal,
    #[ts(type = "string")]
    pub tithe_rate: Percent,
    #[ts(type = "string")]
    pub tithe: Money,
    #[ts(type = "string")]
    pub net_profit: Money,
    #[ts(type = "string")]
    pub discount_percent: Percent,
    #[ts(type = "string")]
    pub discount_amount: Money,
    /// What the customer pays.
    #[ts(type = "string")]
    pub final_total: Money,
}

impl FinancialBreakdown {
    /// Runs the derivation pipeline in its fixed order.
    ///
    /// `discount` is applied as given, even outside 0..=100.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use turf_core::{FinancialBreakdown, Money, Percent};
    ///
    /// let b = FinancialBreakdown::derive(
    ///     Money::from(1000),
    ///     Money::from(200),
    ///     Money::from(200),
    ///     Percent::zero(),
    /// );
    /// assert_eq!(b.company_profit, Money::from(750));
    /// assert_eq!(b.net_profit, Money::from(675));
    /// ```
    pub fn derive(
        gross_revenue: Money,
        total_costs: Money,
        product_cost: Money,
        discount: Percent,
    ) -> Self {
        let invoice_amount = INVOICE_RATE.of(gross_revenue);
        let total_with_invoice = total_costs + invoice_amount;
        let company_profit = gross_revenue - total_with_invoice;
        let profit_percent = company_profit
            .checked_ratio(gross_revenue)
            .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO);
        let tithe = TITHE_RATE.of(company_profit);
        let net_profit = company_profit - tithe;

        let discount_amount = discount.of(gross_revenue);
        let final_total = gross_revenue - discount_amount;

        FinancialBreakdown {
            gross_revenue,
            product_cost,
            total_costs,
            invoice_rate: INVOICE_RATE,
            invoice_amount,
            total_with_invoice,
            company_profit,
            profit_percent,
            tithe_rate: TITHE_RATE,
            tithe,
            net_profit,
            discount_percent: discount,
            discount_amount,
            final_total,
        }
    }

    /// Copy with every value rounded to two places, for persistence and PDF.
    pub fn rounded(&self) -> Self {
        FinancialBreakdown {
            gross_revenue: self.gross_revenue.rounded(),
            product_cost: self.product_cost.rounded(),
            total_costs: self.total_costs.rounded(),
            invoice_rate: self.invoice_rate,
            invoice_amount: self.invoice_amount.rounded(),
            total_with_invoice: self.total_with_invoice.rounded(),
            company_profit: self.company_profit.rounded(),
            profit_percent: crate::money::round_for_display(self.profit_percent),
            tithe_rate: self.tithe_rate,
            tithe: self.tithe.rounded(),
            net_profit: self.net_profit.rounded(),
            discount_percent: self.discount_percent,
            discount_amount: self.discount_amount.rounded(),
            final_total: self.final_total.rounded(),
        }
    }
}

/// The engine: line items, cost entries and discount in, breakdown out.
///
/// Pure and O(n). Safe to call on every keystroke and from many threads.
pub fn compute_breakdown(
    items: &[LineItem],
    costs: &[CostEntry],
    discount: Percent,
) -> FinancialBreakdown {
    let line_totals = aggregate_line_items(items);
    let total_costs = total_costs(&line_totals, costs);

    FinancialBreakdown::derive(
        line_totals.gross_revenue,
        total_costs,
        line_totals.product_cost,
        discount,
    )
}

/// Request shape sent by the editing surface.
///
/// Numeric fields may arrive as strings or numbers; malformed values become
/// zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub costs: Vec<CostEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub discount_percent: Decimal,
}

impl QuoteInput {
    /// Computes the breakdown for this input.
    pub fn compute(&self) -> FinancialBreakdown {
        compute_breakdown(&self.items, &self.costs, Percent::from_decimal(self.discount_percent))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    #[test]
    fn test_zero_case() {
        let b = compute_breakdown(&[], &[], Percent::zero());

        assert!(b.gross_revenue.is_zero());
        assert!(b.product_cost.is_zero());
        assert!(b.total_costs.is_zero());
        assert!(b.invoice_amount.is_zero());
        assert!(b.total_with_invoice.is_zero());
        assert!(b.company_profit.is_zero());
        assert_eq!(b.profit_percent, Decimal::ZERO);
        assert!(b.tithe.is_zero());
        assert!(b.net_profit.is_zero());
        assert!(b.discount_amount.is_zero());
        assert!(b.final_total.is_zero());
    }

    #[test]
    fn test_zero_revenue_with_costs_guards_profit_percent() {
        let b = compute_breakdown(&[], &[CostEntry::fixed("FRT", "Freight", 100, 1)], Percent::zero());

        assert_eq!(b.company_profit.amount(), dec!(-100));
        assert_eq!(b.profit_percent, Decimal::ZERO);
    }

    #[test]
    fn test_pipeline_end_to_end() {
        let b = FinancialBreakdown::derive(money(dec!(1000)), money(dec!(200)), Money::zero(), Percent::zero());

        assert_eq!(b.invoice_amount.amount(), dec!(50));
        assert_eq!(b.total_with_invoice.amount(), dec!(250));
        assert_eq!(b.company_profit.amount(), dec!(750));
        assert_eq!(b.profit_percent, dec!(75));
        assert_eq!(b.tithe.amount(), dec!(75));
        assert_eq!(b.net_profit.amount(), dec!(675));
    }

    #[test]
    fn test_discount_does_not_touch_profit() {
        let plain = FinancialBreakdown::derive(money(dec!(1000)), money(dec!(200)), Money::zero(), Percent::zero());
        let discounted =
            FinancialBreakdown::derive(money(dec!(1000)), money(dec!(200)), Money::zero(), Percent::from(10));

        assert_eq!(discounted.discount_amount.amount(), dec!(100));
        assert_eq!(discounted.final_total.amount(), dec!(900));
        assert_eq!(discounted.company_profit, plain.company_profit);
        assert_eq!(discounted.tithe, plain.tithe);
        assert_eq!(discounted.net_profit, plain.net_profit);
        assert_eq!(discounted.profit_percent, plain.profit_percent);
    }

    #[test]
    fn test_out_of_range_discount_is_not_clamped() {
        let over = FinancialBreakdown::derive(money(dec!(1000)), Money::zero(), Money::zero(), Percent::from(150));
        assert_eq!(over.final_total.amount(), dec!(-500));

        let negative = FinancialBreakdown::derive(money(dec!(1000)), Money::zero(), Money::zero(), Percent::from(-10));
        assert_eq!(negative.final_total.amount(), dec!(1100));
    }

    #[test]
    fn test_two_item_scenario() {
        let items = [
            LineItem::new("A", "Grass 40mm", 20, 10, 25),
            LineItem::new("B", "Shock pad", 5, 8, 12),
        ];
        let costs = [CostEntry::fixed("FRT", "Freight", 50, 2)];
        let b = compute_breakdown(&items, &costs, Percent::zero());

        assert_eq!(b.gross_revenue.amount(), dec!(560));
        assert_eq!(b.product_cost.amount(), dec!(240));
        assert_eq!(b.total_costs.amount(), dec!(340));
        assert_eq!(b.invoice_amount.amount(), dec!(28));
        assert_eq!(b.total_with_invoice.amount(), dec!(368));
        assert_eq!(b.company_profit.amount(), dec!(192));
        assert_eq!(crate::money::round_for_display(b.profit_percent), dec!(34.29));
        assert_eq!(b.tithe.amount(), dec!(19.2));
        assert_eq!(b.net_profit.amount(), dec!(172.8));
        assert_eq!(b.final_total.amount(), dec!(560));
    }

    #[test]
    fn test_recompute_is_bit_identical() {
        let items = [
            LineItem::new("A", "Grass", dec!(13.37), dec!(9.99), dec!(21.5)),
            LineItem::new("B", "Glue", 3, dec!(45.1), dec!(70)),
        ];
        let costs = [
            CostEntry::fixed("FRT", "Freight", dec!(80.5), 2),
            CostEntry::percentage("INS", "Insurance", dec!(333.33), dec!(7.5)),
        ];

        let first = compute_breakdown(&items, &costs, Percent::from_decimal(dec!(3.5)));
        let second = compute_breakdown(&items, &costs, Percent::from_decimal(dec!(3.5)));

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_full_precision_until_rounded() {
        let items = [LineItem::new("A", "Grass", 1, 0, dec!(0.33))];
        let b = compute_breakdown(&items, &[], Percent::zero());

        // 0.33 × 5% = 0.0165 stays exact internally
        assert_eq!(b.invoice_amount.amount(), dec!(0.0165));
        assert_eq!(b.rounded().invoice_amount.amount(), dec!(0.02));
    }

    #[test]
    fn test_quote_input_from_editing_surface() {
        let json = r#"{
            "items": [
                {"productReference": "A", "quantity": "20", "unitCost": "10", "unitSalePrice": "25"},
                {"productReference": "B", "quantity": 5, "unitCost": 8, "unitSalePrice": "12"}
            ],
            "costs": [
                {"name": "Freight", "calculationMode": "fixed", "unitValue": "50", "quantity": "2"}
            ],
            "discountPercent": "10"
        }"#;
        let input: QuoteInput = serde_json::from_str(json).unwrap();
        let b = input.compute();

        assert_eq!(b.gross_revenue.amount(), dec!(560));
        assert_eq!(b.total_costs.amount(), dec!(340));
        assert_eq!(b.discount_amount.amount(), dec!(56));
        assert_eq!(b.final_total.amount(), dec!(504));
    }

    #[test]
    fn test_quote_input_garbage_discount() {
        let input: QuoteInput = serde_json::from_str(r#"{"discountPercent": "ten"}"#).unwrap();
        let b = input.compute();
        assert!(b.discount_percent.is_zero());
        assert!(b.final_total.is_zero());
    }
}
