//! # Editing Drafts
//!
//! The quotation being edited, as a sequence of immutable revisions.
//!
//! ## Revision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Edit event            DraftEdit                 New revision           │
//! │  ──────────            ─────────                 ────────────           │
//! │  Add product row ────► AddItem ───────────────►  rev n+1 + breakdown    │
//! │  Type a quantity ────► UpdateItem{index} ─────►  rev n+1 + breakdown    │
//! │  Delete cost row ────► RemoveCost{index} ─────►  rev n+1 + breakdown    │
//! │  Change discount ────► SetDiscount ───────────►  rev n+1 + breakdown    │
//! │                                                                         │
//! │  Revision n is never modified. DraftSession swaps the whole slot.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::breakdown::{compute_breakdown, FinancialBreakdown, QuoteInput};
use crate::error::{CoreError, CoreResult};
use crate::money::Percent;
use crate::numeric::lenient;
use crate::types::{CostEntry, LineItem};

/// One edit coming from the editing surface.
///
/// Variant tags are snake_case (`"set_discount"`), payload fields camelCase
/// like every other request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DraftEdit {
    AddItem { item: LineItem },
    UpdateItem { index: usize, item: LineItem },
    RemoveItem { index: usize },
    AddCost { cost: CostEntry },
    UpdateCost { index: usize, cost: CostEntry },
    RemoveCost { index: usize },
    /// Malformed or missing discounts become 0.
    SetDiscount {
        #[serde(default, deserialize_with = "lenient")]
        discount_percent: Decimal,
    },
    /// Discards every line and cost and resets the discount.
    Clear,
}

/// An immutable revision of the quotation being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    revision: u64,
    items: Vec<LineItem>,
    costs: Vec<CostEntry>,
    discount_percent: Percent,
    breakdown: FinancialBreakdown,
}

impl Default for QuoteDraft {
    fn default() -> Self {
        QuoteDraft::new(Vec::new(), Vec::new(), Percent::zero())
    }
}

impl QuoteDraft {
    /// Revision 0 built from initial contents (e.g. a saved quotation).
    pub fn new(items: Vec<LineItem>, costs: Vec<CostEntry>, discount_percent: Percent) -> Self {
        Self::build(0, items, costs, discount_percent)
    }

    /// Revision 0 built from the editing surface's request shape.
    pub fn from_input(input: QuoteInput) -> Self {
        Self::new(input.items, input.costs, Percent::from_decimal(input.discount_percent))
    }

    fn build(revision: u64, items: Vec<LineItem>, costs: Vec<CostEntry>, discount_percent: Percent) -> Self {
        let breakdown = compute_breakdown(&items, &costs, discount_percent);
        QuoteDraft {
            revision,
            items,
            costs,
            discount_percent,
            breakdown,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn costs(&self) -> &[CostEntry] {
        &self.costs
    }

    pub fn discount_percent(&self) -> Percent {
        self.discount_percent
    }

    /// Breakdown of this revision. Always consistent with its contents.
    pub fn breakdown(&self) -> &FinancialBreakdown {
        &self.breakdown
    }

    /// Returns the next revision with `edit` applied and the breakdown
    /// recomputed from scratch. `self` is left untouched.
    ///
    /// ## Errors
    /// `CoreError::LineNotFound` when an index does not exist.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use turf_core::{DraftEdit, LineItem, QuoteDraft};
    ///
    /// let draft = QuoteDraft::default();
    /// let next = draft
    ///     .apply(DraftEdit::AddItem { item: LineItem::new("A", "Grass", 10, 2, 5) })
    ///     .unwrap();
    ///
    /// assert_eq!(draft.revision(), 0);
    /// assert_eq!(next.revision(), 1);
    /// assert_eq!(next.breakdown().gross_revenue.amount(), Decimal::from(50));
    /// ```
    pub fn apply(&self, edit: DraftEdit) -> CoreResult<QuoteDraft> {
        let mut items = self.items.clone();
        let mut costs = self.costs.clone();
        let mut discount_percent = self.discount_percent;

        match edit {
            DraftEdit::AddItem { item } => items.push(item),
            DraftEdit::UpdateItem { index, item } => {
                *slot(&mut items, index, "item")? = item;
            }
            DraftEdit::RemoveItem { index } => {
                check_index(items.len(), index, "item")?;
                items.remove(index);
            }
            DraftEdit::AddCost { cost } => costs.push(cost),
            DraftEdit::UpdateCost { index, cost } => {
                *slot(&mut costs, index, "cost")? = cost;
            }
            DraftEdit::RemoveCost { index } => {
                check_index(costs.len(), index, "cost")?;
                costs.remove(index);
            }
            DraftEdit::SetDiscount { discount_percent: d } => {
                discount_percent = Percent::from_decimal(d);
            }
            DraftEdit::Clear => {
                items.clear();
                costs.clear();
                discount_percent = Percent::zero();
            }
        }

        Ok(Self::build(self.revision + 1, items, costs, discount_percent))
    }

    /// The draft as the request shape (for saving or re-sending).
    pub fn to_input(&self) -> QuoteInput {
        QuoteInput {
            items: self.items.clone(),
            costs: self.costs.clone(),
            discount_percent: self.discount_percent.value(),
        }
    }
}

fn check_index(len: usize, index: usize, kind: &'static str) -> CoreResult<()> {
    if index >= len {
        return Err(CoreError::LineNotFound { kind, index, len });
    }
    Ok(())
}

fn slot<'a, T>(lines: &'a mut [T], index: usize, kind: &'static str) -> CoreResult<&'a mut T> {
    let len = lines.len();
    lines
        .get_mut(index)
        .ok_or(CoreError::LineNotFound { kind, index, len })
}

// =============================================================================
// Session Slot
// =============================================================================

/// The single current-revision slot owned by one editing session.
///
/// Each edit replaces the whole `Arc<QuoteDraft>`; readers holding an older
/// `Arc` keep a consistent revision.
#[derive(Debug, Clone, Default)]
pub struct DraftSession {
    current: Arc<Mutex<Arc<QuoteDraft>>>,
}

impl DraftSession {
    pub fn new(draft: QuoteDraft) -> Self {
        DraftSession {
            current: Arc::new(Mutex::new(Arc::new(draft))),
        }
    }

    /// Snapshot of the current revision.
    pub fn current(&self) -> Arc<QuoteDraft> {
        let guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Applies an edit and swaps in the resulting revision.
    ///
    /// Edits are serialized: one completes before the next is accepted. On
    /// error the current revision is kept.
    pub fn apply(&self, edit: DraftEdit) -> CoreResult<Arc<QuoteDraft>> {
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let next = Arc::new(guard.apply(edit)?);
        *guard = Arc::clone(&next);
        Ok(next)
    }

    /// Replaces the draft wholesale (e.g. after loading a saved quotation).
    pub fn reset(&self, draft: QuoteDraft) -> Arc<QuoteDraft> {
        let next = Arc::new(draft);
        let mut guard = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&next);
        next
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::thread;

    #[test]
    fn test_every_edit_recomputes() {
        let d0 = QuoteDraft::default();
        let d1 = d0
            .apply(DraftEdit::AddItem { item: LineItem::new("A", "Grass", 20, 10, 25) })
            .unwrap();
        let d2 = d1
            .apply(DraftEdit::AddItem { item: LineItem::new("B", "Pad", 5, 8, 12) })
            .unwrap();
        let d3 = d2
            .apply(DraftEdit::AddCost { cost: CostEntry::fixed("FRT", "Freight", 50, 2) })
            .unwrap();

        assert_eq!(d3.revision(), 3);
        assert_eq!(d3.breakdown().gross_revenue.amount(), dec!(560));
        assert_eq!(d3.breakdown().total_costs.amount(), dec!(340));
        assert_eq!(d3.breakdown().net_profit.amount(), dec!(172.8));

        let d4 = d3
            .apply(DraftEdit::SetDiscount { discount_percent: dec!(10) })
            .unwrap();
        assert_eq!(d4.breakdown().final_total.amount(), dec!(504));
        assert_eq!(d4.breakdown().company_profit, d3.breakdown().company_profit);
    }

    #[test]
    fn test_previous_revision_untouched() {
        let d1 = QuoteDraft::new(vec![LineItem::new("A", "Grass", 1, 1, 10)], vec![], Percent::zero());
        let d2 = d1
            .apply(DraftEdit::UpdateItem { index: 0, item: LineItem::new("A", "Grass", 3, 1, 10) })
            .unwrap();

        assert_eq!(d1.breakdown().gross_revenue.amount(), dec!(10));
        assert_eq!(d2.breakdown().gross_revenue.amount(), dec!(30));
    }

    #[test]
    fn test_update_and_remove_cost() {
        let d1 = QuoteDraft::new(vec![], vec![CostEntry::fixed("X", "Labour", 100, 1)], Percent::zero());
        let d2 = d1
            .apply(DraftEdit::UpdateCost {
                index: 0,
                cost: CostEntry::percentage("X", "Labour", 100, 50),
            })
            .unwrap();
        assert_eq!(d2.breakdown().total_costs.amount(), dec!(50));

        let d3 = d2.apply(DraftEdit::RemoveCost { index: 0 }).unwrap();
        assert!(d3.costs().is_empty());
        assert!(d3.breakdown().total_costs.is_zero());
    }

    #[test]
    fn test_bad_index_is_an_error() {
        let draft = QuoteDraft::default();
        let err = draft.apply(DraftEdit::RemoveItem { index: 0 }).unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound { kind: "item", index: 0, len: 0 }));

        let err = draft
            .apply(DraftEdit::UpdateCost { index: 2, cost: CostEntry::fixed("X", "X", 1, 1) })
            .unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound { kind: "cost", .. }));
    }

    #[test]
    fn test_clear() {
        let draft = QuoteDraft::new(
            vec![LineItem::new("A", "Grass", 1, 1, 10)],
            vec![CostEntry::fixed("X", "X", 1, 1)],
            Percent::from(5),
        );
        let cleared = draft.apply(DraftEdit::Clear).unwrap();

        assert!(cleared.items().is_empty());
        assert!(cleared.costs().is_empty());
        assert_eq!(cleared.breakdown(), QuoteDraft::default().breakdown());
    }

    #[test]
    fn test_edit_from_json() {
        let edit: DraftEdit = serde_json::from_str(
            r#"{"type": "add_item", "item": {"productReference": "A", "quantity": "2", "unitSalePrice": "9.5"}}"#,
        )
        .unwrap();
        let draft = QuoteDraft::default().apply(edit).unwrap();
        assert_eq!(draft.breakdown().gross_revenue.amount(), dec!(19));
    }

    #[test]
    fn test_set_discount_from_json() {
        let draft = QuoteDraft::new(vec![LineItem::new("A", "Grass", 20, 10, 25)], vec![], Percent::zero());
        let set = |json: &str| {
            let edit: DraftEdit = serde_json::from_str(json).unwrap();
            draft.apply(edit).unwrap()
        };

        let ten = set(r#"{"type": "set_discount", "discountPercent": "10"}"#);
        assert_eq!(ten.discount_percent().value(), dec!(10));
        assert_eq!(ten.breakdown().final_total.amount(), dec!(450));

        assert_eq!(set(r#"{"type": "set_discount", "discountPercent": 7.5}"#).discount_percent().value(), dec!(7.5));

        for malformed in [
            r#"{"type": "set_discount", "discountPercent": "ten"}"#,
            r#"{"type": "set_discount", "discountPercent": null}"#,
            r#"{"type": "set_discount"}"#,
        ] {
            let d = set(malformed);
            assert!(d.discount_percent().is_zero(), "{malformed}");
            assert_eq!(d.breakdown().final_total.amount(), dec!(500));
        }
    }

    #[test]
    fn test_edit_payload_fields_are_camel_case() {
        let json = serde_json::to_value(DraftEdit::SetDiscount { discount_percent: dec!(5) }).unwrap();
        assert_eq!(json["type"], "set_discount");
        assert!(json.get("discountPercent").is_some());
    }

    #[test]
    fn test_session_keeps_revision_on_error() {
        let session = DraftSession::default();
        session
            .apply(DraftEdit::AddItem { item: LineItem::new("A", "Grass", 1, 1, 10) })
            .unwrap();

        assert!(session.apply(DraftEdit::RemoveItem { index: 9 }).is_err());
        assert_eq!(session.current().revision(), 1);
    }

    #[test]
    fn test_session_serializes_concurrent_edits() {
        let session = DraftSession::default();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = session.clone();
                thread::spawn(move || {
                    s.apply(DraftEdit::AddItem { item: LineItem::new("A", "Grass", 1, 0, 10) })
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let current = session.current();
        assert_eq!(current.revision(), 8);
        assert_eq!(current.items().len(), 8);
        assert_eq!(current.breakdown().gross_revenue.amount(), dec!(80));
    }

    #[test]
    fn test_round_trip_to_input() {
        let draft = QuoteDraft::new(vec![LineItem::new("A", "Grass", 2, 1, 10)], vec![], Percent::from(5));
        let rebuilt = QuoteDraft::from_input(draft.to_input());
        assert_eq!(rebuilt.breakdown(), draft.breakdown());
    }
}
