//! # Aggregation
//!
//! Reduces line items and cost entries to the totals the breakdown pipeline
//! starts from.
//!
//! ```text
//! items ──► aggregate_line_items ──► gross_revenue
//!                                └─► product_cost ──┐
//! costs ──► aggregate_costs ────────────────────────┴─► total_costs
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{CostEntry, LineItem};

/// Revenue and cost of the product lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTotals {
    /// Σ quantity × unit_sale_price.
    pub gross_revenue: Money,
    /// Σ quantity × unit_cost.
    pub product_cost: Money,
}

/// Sums revenue and cost over all line items. An empty slice yields zeros.
pub fn aggregate_line_items(items: &[LineItem]) -> LineTotals {
    items.iter().fold(LineTotals::default(), |mut totals, item| {
        totals.gross_revenue += item.line_revenue();
        totals.product_cost += item.line_cost();
        totals
    })
}

/// Sums `total_value()` over all cost entries (product cost excluded).
pub fn aggregate_costs(costs: &[CostEntry]) -> Money {
    costs.iter().map(CostEntry::total_value).sum()
}

/// `product_cost + Σ cost entries`.
pub fn total_costs(line_totals: &LineTotals, costs: &[CostEntry]) -> Money {
    line_totals.product_cost + aggregate_costs(costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_inputs() {
        let totals = aggregate_line_items(&[]);
        assert!(totals.gross_revenue.is_zero());
        assert!(totals.product_cost.is_zero());
        assert!(aggregate_costs(&[]).is_zero());
    }

    #[test]
    fn test_single_item_linearity() {
        let totals = aggregate_line_items(&[LineItem::new("A", "Grass", 10, 2, 5)]);
        assert_eq!(totals.gross_revenue.amount(), dec!(50));
        assert_eq!(totals.product_cost.amount(), dec!(20));
    }

    #[test]
    fn test_two_items() {
        let items = [
            LineItem::new("A", "Grass 40mm", 20, 10, 25),
            LineItem::new("B", "Shock pad", 5, 8, 12),
        ];
        let totals = aggregate_line_items(&items);
        assert_eq!(totals.gross_revenue.amount(), dec!(560));
        assert_eq!(totals.product_cost.amount(), dec!(240));
    }

    #[test]
    fn test_fractional_quantities() {
        let items = [LineItem::new("A", "Grass", dec!(12.5), dec!(3.2), dec!(7.99))];
        let totals = aggregate_line_items(&items);
        assert_eq!(totals.gross_revenue.amount(), dec!(99.875));
        assert_eq!(totals.product_cost.amount(), dec!(40));
    }

    #[test]
    fn test_negative_quantity_is_permitted() {
        let totals = aggregate_line_items(&[LineItem::new("RET", "Return", -2, 10, 25)]);
        assert_eq!(totals.gross_revenue.amount(), dec!(-50));
        assert_eq!(totals.product_cost.amount(), dec!(-20));
    }

    #[test]
    fn test_total_costs_includes_product_cost() {
        let totals = aggregate_line_items(&[LineItem::new("A", "Grass", 20, 10, 25)]);
        let costs = [
            CostEntry::fixed("FRT", "Freight", 50, 2),
            CostEntry::percentage("INS", "Insurance", 200, 10),
        ];
        assert_eq!(aggregate_costs(&costs).amount(), dec!(120));
        assert_eq!(total_costs(&totals, &costs).amount(), dec!(320));
    }
}
