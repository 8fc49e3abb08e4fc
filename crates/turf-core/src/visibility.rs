//! # Role-Based Visibility
//!
//! Decides which parts of a quotation a viewer may receive.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field                         Admin        Salesperson                 │
//! │  ─────────────────────────     ─────        ───────────                 │
//! │  gross_revenue / final_total   ✅           ✅                           │
//! │  discount % / amount           ✅           ✅                           │
//! │  own commission                ─            ✅ (only if percent > 0)     │
//! │  costs, invoice                ✅           ❌ never serialized          │
//! │  company / net profit, tithe   ✅           ❌ never serialized          │
//! │  line item unit_cost           ✅           ❌ never serialized          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Restricted fields are not `null`ed out: the salesperson shapes simply do
//! not have them, so a payload built here cannot leak them over the wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::breakdown::FinancialBreakdown;
use crate::commission::commission_amount;
use crate::money::{Money, Percent};
use crate::types::{CostEntry, LineItem, Quotation, QuotationHeader, Role, Viewer};

// =============================================================================
// Breakdown
// =============================================================================

/// Figures a salesperson is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedBreakdown {
    pub gross_revenue: Money,
    pub discount_percent: Percent,
    pub discount_amount: Money,
    pub final_total: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<Money>,
}

/// A breakdown filtered for one viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum BreakdownView {
    Full(FinancialBreakdown),
    Restricted(RestrictedBreakdown),
}

impl BreakdownView {
    /// Filters `breakdown` for the viewer's role.
    ///
    /// A salesperson with a positive commission percentage also gets their
    /// commission on `final_total`.
    pub fn for_viewer(breakdown: &FinancialBreakdown, viewer: &Viewer) -> Self {
        Self::project(breakdown, viewer, true)
    }

    /// Like [`for_viewer`](Self::for_viewer), but `earns_commission` decides
    /// whether the quotation belongs to the viewer.
    fn project(breakdown: &FinancialBreakdown, viewer: &Viewer, earns_commission: bool) -> Self {
        match viewer.role {
            Role::Admin => BreakdownView::Full(*breakdown),
            Role::Salesperson => {
                let commission = (earns_commission && viewer.commission_percent.is_positive())
                    .then(|| commission_amount(breakdown.final_total, viewer.commission_percent));

                BreakdownView::Restricted(RestrictedBreakdown {
                    gross_revenue: breakdown.gross_revenue,
                    discount_percent: breakdown.discount_percent,
                    discount_amount: breakdown.discount_amount,
                    final_total: breakdown.final_total,
                    commission,
                })
            }
        }
    }

    /// Amount the customer pays, visible to every role.
    pub fn final_total(&self) -> Money {
        match self {
            BreakdownView::Full(b) => b.final_total,
            BreakdownView::Restricted(r) => r.final_total,
        }
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// A line item as sent to a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    pub product_reference: String,
    pub product_name: String,
    pub quantity: Decimal,
    pub unit_sale_price: Decimal,
    pub line_revenue: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_cost: Option<Money>,
}

impl LineItemView {
    pub fn for_role(item: &LineItem, role: Role) -> Self {
        let privileged = role.is_privileged();
        LineItemView {
            product_reference: item.product_reference.clone(),
            product_name: item.product_name.clone(),
            quantity: item.quantity,
            unit_sale_price: item.unit_sale_price,
            line_revenue: item.line_revenue(),
            unit_cost: privileged.then_some(item.unit_cost),
            line_cost: privileged.then(|| item.line_cost()),
        }
    }
}

// =============================================================================
// Quotation
// =============================================================================

/// A stored quotation as sent to a viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationView {
    pub id: String,
    pub number: String,
    pub header: QuotationHeader,
    pub items: Vec<LineItemView>,
    /// Cost entries, admin only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<CostEntry>>,
    pub breakdown: BreakdownView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuotationView {
    /// Projects a stored quotation for the viewer.
    ///
    /// Commission appears only when the viewer is the responsible salesperson,
    /// computed from the stored `final_total`.
    pub fn for_viewer(quotation: &Quotation, viewer: &Viewer) -> Self {
        let owns = quotation.header.responsible_id == viewer.user_id;

        QuotationView {
            id: quotation.id.clone(),
            number: quotation.number.clone(),
            header: quotation.header.clone(),
            items: quotation
                .items
                .iter()
                .map(|item| LineItemView::for_role(item, viewer.role))
                .collect(),
            costs: viewer.role.is_privileged().then(|| quotation.costs.clone()),
            breakdown: BreakdownView::project(&quotation.breakdown, viewer, owns),
            created_at: quotation.created_at,
            updated_at: quotation.updated_at,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::compute_breakdown;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    const WITHHELD: [&str; 8] = [
        "totalCosts",
        "productCost",
        "companyProfit",
        "tithe",
        "netProfit",
        "invoiceAmount",
        "totalWithInvoice",
        "profitPercent",
    ];

    fn sample_breakdown() -> FinancialBreakdown {
        let items = [
            LineItem::new("A", "Grass 40mm", 20, 10, 25),
            LineItem::new("B", "Shock pad", 5, 8, 12),
        ];
        let costs = [CostEntry::fixed("FRT", "Freight", 50, 2)];
        compute_breakdown(&items, &costs, Percent::from(10))
    }

    fn keys(view: &BreakdownView) -> serde_json::Map<String, Value> {
        match serde_json::to_value(view).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_salesperson_view_withholds_internal_figures() {
        let viewer = Viewer::salesperson("u1", "Ana", Percent::from(5));
        let map = keys(&BreakdownView::for_viewer(&sample_breakdown(), &viewer));

        for field in WITHHELD {
            assert!(!map.contains_key(field), "{field} leaked to salesperson");
        }
        assert_eq!(map["scope"], "restricted");
        assert!(map.contains_key("grossRevenue"));
        assert!(map.contains_key("finalTotal"));
        assert!(map.contains_key("discountAmount"));
    }

    #[test]
    fn test_salesperson_commission_on_final_total() {
        let viewer = Viewer::salesperson("u1", "Ana", Percent::from(5));
        let view = BreakdownView::for_viewer(&sample_breakdown(), &viewer);

        let BreakdownView::Restricted(r) = view else {
            panic!("salesperson must get a restricted view");
        };
        // final_total = 560 - 56 = 504
        assert_eq!(r.final_total.amount(), dec!(504));
        assert_eq!(r.commission.map(|c| c.amount()), Some(dec!(25.2)));
    }

    #[test]
    fn test_zero_commission_is_omitted() {
        let viewer = Viewer::salesperson("u1", "Ana", Percent::zero());
        let map = keys(&BreakdownView::for_viewer(&sample_breakdown(), &viewer));
        assert!(!map.contains_key("commission"));
    }

    #[test]
    fn test_admin_view_contains_everything() {
        let viewer = Viewer::admin("root", "Owner");
        let map = keys(&BreakdownView::for_viewer(&sample_breakdown(), &viewer));

        for field in WITHHELD {
            assert!(map.contains_key(field), "{field} missing for admin");
        }
        assert_eq!(map["scope"], "full");
    }

    #[test]
    fn test_line_item_unit_cost_hidden_from_salesperson() {
        let item = LineItem::new("A", "Grass", 20, 10, 25);

        let seller = serde_json::to_value(LineItemView::for_role(&item, Role::Salesperson)).unwrap();
        assert!(seller.get("unitCost").is_none());
        assert!(seller.get("lineCost").is_none());
        assert_eq!(seller["lineRevenue"], "500");

        let admin = serde_json::to_value(LineItemView::for_role(&item, Role::Admin)).unwrap();
        assert_eq!(admin["unitCost"], "10");
        assert_eq!(admin["lineCost"], "200");
    }

    #[test]
    fn test_quotation_view_commission_only_for_owner() {
        let items = vec![LineItem::new("A", "Grass", 10, 4, 10)];
        let costs = vec![CostEntry::fixed("FRT", "Freight", 10, 1)];
        let breakdown = compute_breakdown(&items, &costs, Percent::zero());
        let quotation = Quotation {
            id: "q1".into(),
            number: "#001".into(),
            header: QuotationHeader {
                customer_id: "c1".into(),
                customer_name: "Clube Verde".into(),
                responsible_id: "u1".into(),
                responsible_name: "Ana".into(),
                ..Default::default()
            },
            items,
            costs,
            breakdown,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let owner = QuotationView::for_viewer(&quotation, &Viewer::salesperson("u1", "Ana", Percent::from(10)));
        let other = QuotationView::for_viewer(&quotation, &Viewer::salesperson("u2", "Bia", Percent::from(10)));
        let admin = QuotationView::for_viewer(&quotation, &Viewer::admin("root", "Owner"));

        assert!(owner.costs.is_none());
        assert!(matches!(
            owner.breakdown,
            BreakdownView::Restricted(RestrictedBreakdown { commission: Some(c), .. }) if c == Money::from(10)
        ));
        assert!(matches!(
            other.breakdown,
            BreakdownView::Restricted(RestrictedBreakdown { commission: None, .. })
        ));
        assert_eq!(admin.costs.as_ref().map(Vec::len), Some(1));
        assert!(matches!(admin.breakdown, BreakdownView::Full(_)));

        let json = serde_json::to_value(&owner).unwrap();
        assert!(json.get("costs").is_none());
        assert!(json["items"][0].get("unitCost").is_none());
    }
}
