//! # Commission
//!
//! Commission is earned by the salesperson responsible for a quotation,
//! on the amount the customer actually pays (`final_total`, after discount).
//!
//! ## Where It Shows Up
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quotation detail (salesperson view)                                   │
//! │     final_total × viewer.commission_percent ──► "Your commission"      │
//! │                                                                         │
//! │  Commission report (admin)                                             │
//! │     approved quotations ──► group by responsible ──► Σ final_total     │
//! │                                              └──► × commission_percent │
//! │     pending / rejected quotations never count                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent};
use crate::types::{QuotationSummary, QuoteStatus, Salesperson};

/// `base * percent / 100`.
///
/// ## Example
/// ```rust
/// use turf_core::{commission_amount, Money, Percent};
///
/// let commission = commission_amount(Money::from(900), Percent::from(5));
/// assert_eq!(commission, Money::from(45));
/// ```
#[inline]
pub fn commission_amount(base: Money, percent: Percent) -> Money {
    percent.of(base)
}

/// Commission owed to one salesperson over their approved quotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommissionReport {
    pub salesperson_id: String,
    pub salesperson_name: String,
    #[ts(type = "string")]
    pub commission_percent: Percent,
    pub approved_count: usize,
    /// Σ final_total of approved quotations.
    #[ts(type = "string")]
    pub approved_total: Money,
    #[ts(type = "string")]
    pub commission: Money,
}

/// Builds one report per salesperson with at least one approved quotation.
///
/// Quotations whose responsible person is unknown are skipped: there is no
/// percentage to apply. Reports are ordered by salesperson name, then ID.
pub fn summarize_commissions(
    quotations: &[QuotationSummary],
    salespeople: &[Salesperson],
) -> Vec<CommissionReport> {
    let by_id: HashMap<&str, &Salesperson> =
        salespeople.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut totals: HashMap<&str, (usize, Money)> = HashMap::new();
    for quote in quotations
        .iter()
        .filter(|q| q.status == QuoteStatus::Approved)
    {
        if !by_id.contains_key(quote.responsible_id.as_str()) {
            continue;
        }
        let entry = totals
            .entry(quote.responsible_id.as_str())
            .or_insert((0, Money::zero()));
        entry.0 += 1;
        entry.1 += quote.final_total;
    }

    let mut reports: Vec<CommissionReport> = totals
        .into_iter()
        .filter_map(|(id, (count, total))| {
            let person = by_id.get(id)?;
            Some(CommissionReport {
                salesperson_id: person.id.clone(),
                salesperson_name: person.name.clone(),
                commission_percent: person.commission_percent,
                approved_count: count,
                approved_total: total,
                commission: commission_amount(total, person.commission_percent),
            })
        })
        .collect();

    reports.sort_by(|a, b| {
        a.salesperson_name
            .cmp(&b.salesperson_name)
            .then_with(|| a.salesperson_id.cmp(&b.salesperson_id))
    });
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn person(id: &str, name: &str, pct: i32) -> Salesperson {
        Salesperson {
            id: id.to_string(),
            name: name.to_string(),
            role: Role::Salesperson,
            commission_percent: Percent::from(pct),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn quote(number: &str, status: QuoteStatus, responsible: &str, total: i64) -> QuotationSummary {
        QuotationSummary {
            id: format!("id-{number}"),
            number: number.to_string(),
            status,
            responsible_id: responsible.to_string(),
            final_total: Money::from(total),
        }
    }

    #[test]
    fn test_commission_amount() {
        assert_eq!(commission_amount(Money::from(900), Percent::from(5)), Money::from(45));
        assert_eq!(commission_amount(Money::from(900), Percent::zero()), Money::zero());
        assert_eq!(
            commission_amount(Money::new(dec!(333.33)), Percent::from_decimal(dec!(2.5))).amount(),
            dec!(8.33325)
        );
    }

    #[test]
    fn test_only_approved_quotations_count() {
        let people = [person("u1", "Ana", 5), person("u2", "Bruno", 10)];
        let quotes = [
            quote("#001", QuoteStatus::Approved, "u1", 1000),
            quote("#002", QuoteStatus::Pending, "u1", 5000),
            quote("#003", QuoteStatus::Approved, "u1", 500),
            quote("#004", QuoteStatus::Rejected, "u2", 9000),
            quote("#005", QuoteStatus::Approved, "u2", 200),
        ];

        let reports = summarize_commissions(&quotes, &people);

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].salesperson_name, "Ana");
        assert_eq!(reports[0].approved_count, 2);
        assert_eq!(reports[0].approved_total, Money::from(1500));
        assert_eq!(reports[0].commission, Money::from(75));

        assert_eq!(reports[1].salesperson_name, "Bruno");
        assert_eq!(reports[1].approved_count, 1);
        assert_eq!(reports[1].commission, Money::from(20));
    }

    #[test]
    fn test_unknown_responsible_is_skipped() {
        let people = [person("u1", "Ana", 5)];
        let quotes = [quote("#001", QuoteStatus::Approved, "ghost", 1000)];

        assert!(summarize_commissions(&quotes, &people).is_empty());
    }

    #[test]
    fn test_no_approved_quotations() {
        let people = [person("u1", "Ana", 5)];
        let quotes = [quote("#001", QuoteStatus::Pending, "u1", 1000)];

        assert!(summarize_commissions(&quotes, &people).is_empty());
    }
}
