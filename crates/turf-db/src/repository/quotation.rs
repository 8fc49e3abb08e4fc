//! # Quotation Repository
//!
//! Database operations for quotations, their product lines and cost entries.
//!
//! ## Quotation Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Quotation Lifecycle                               │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → validate → compute_breakdown → round to 2 dp        │
//! │         └── status = Pending, number = #NNN (count + 1)                │
//! │             counted and inserted under one write lock                  │
//! │                                                                         │
//! │  2. EDIT (any number of times)                                         │
//! │     └── update() → recompute from scratch, replace lines and costs     │
//! │                                                                         │
//! │  3. DECIDE                                                             │
//! │     └── update_status(Approved | Rejected)                             │
//! │         └── Approved quotations count towards commission               │
//! │                                                                         │
//! │  4. (OPTIONAL) REOPEN / DELETE                                         │
//! │     └── update_status(Pending) or delete()                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! The stored breakdown is the engine's output at save time. Reads return
//! it as stored and never recompute, so a later change to the rates does
//! not rewrite quotations already sent to customers.

use chrono::{NaiveDate, SubsecRound, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{decimal_column, timestamp_column, timestamp_text};
use turf_core::money::format_fixed;
use turf_core::validation::validate_new_quotation;
use turf_core::{
    next_quote_number, CalculationMode, CostEntry, FinancialBreakdown, LineItem, Money,
    NewQuotation, Percent, Quotation, QuotationHeader, QuotationSummary, QuoteStatus,
};

// =============================================================================
// Row Types
// =============================================================================

/// Raw `quotations` row. Money columns are fixed two-decimal TEXT.
#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: String,
    number: String,
    customer_id: String,
    customer_name: String,
    valid_until: Option<NaiveDate>,
    status: QuoteStatus,
    notes: Option<String>,
    shipping_terms: Option<String>,
    warranty_terms: Option<String>,
    responsible_id: String,
    responsible_name: String,
    gross_revenue: String,
    product_cost: String,
    total_costs: String,
    invoice_rate: String,
    invoice_amount: String,
    total_with_invoice: String,
    company_profit: String,
    profit_percent: String,
    tithe_rate: String,
    tithe: String,
    net_profit: String,
    discount_percent: String,
    discount_amount: String,
    final_total: String,
    created_at: String,
    updated_at: String,
}

impl QuotationRow {
    fn breakdown(&self) -> DbResult<FinancialBreakdown> {
        let money = |column: &str, raw: &str| decimal_column(column, raw).map(Money::new);
        let percent = |column: &str, raw: &str| decimal_column(column, raw).map(Percent::from_decimal);

        Ok(FinancialBreakdown {
            gross_revenue: money("gross_revenue", &self.gross_revenue)?,
            product_cost: money("product_cost", &self.product_cost)?,
            total_costs: money("total_costs", &self.total_costs)?,
            invoice_rate: percent("invoice_rate", &self.invoice_rate)?,
            invoice_amount: money("invoice_amount", &self.invoice_amount)?,
            total_with_invoice: money("total_with_invoice", &self.total_with_invoice)?,
            company_profit: money("company_profit", &self.company_profit)?,
            profit_percent: decimal_column("profit_percent", &self.profit_percent)?,
            tithe_rate: percent("tithe_rate", &self.tithe_rate)?,
            tithe: money("tithe", &self.tithe)?,
            net_profit: money("net_profit", &self.net_profit)?,
            discount_percent: percent("discount_percent", &self.discount_percent)?,
            discount_amount: money("discount_amount", &self.discount_amount)?,
            final_total: money("final_total", &self.final_total)?,
        })
    }

    fn into_quotation(self, items: Vec<LineItem>, costs: Vec<CostEntry>) -> DbResult<Quotation> {
        let breakdown = self.breakdown()?;
        let created_at = timestamp_column("created_at", &self.created_at)?;
        let updated_at = timestamp_column("updated_at", &self.updated_at)?;

        Ok(Quotation {
            id: self.id,
            number: self.number,
            header: QuotationHeader {
                customer_id: self.customer_id,
                customer_name: self.customer_name,
                valid_until: self.valid_until,
                status: self.status,
                notes: self.notes,
                shipping_terms: self.shipping_terms,
                warranty_terms: self.warranty_terms,
                responsible_id: self.responsible_id,
                responsible_name: self.responsible_name,
            },
            items,
            costs,
            breakdown,
            created_at,
            updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    product_reference: String,
    product_name: String,
    quantity: String,
    unit_cost: String,
    unit_sale_price: String,
}

impl TryFrom<ItemRow> for LineItem {
    type Error = DbError;

    fn try_from(row: ItemRow) -> DbResult<Self> {
        Ok(LineItem {
            quantity: decimal_column("quantity", &row.quantity)?,
            unit_cost: decimal_column("unit_cost", &row.unit_cost)?,
            unit_sale_price: decimal_column("unit_sale_price", &row.unit_sale_price)?,
            product_reference: row.product_reference,
            product_name: row.product_name,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CostRow {
    reference: String,
    name: String,
    calculation_mode: CalculationMode,
    unit_value: String,
    quantity: String,
    percentage_value: String,
}

impl TryFrom<CostRow> for CostEntry {
    type Error = DbError;

    fn try_from(row: CostRow) -> DbResult<Self> {
        Ok(CostEntry {
            unit_value: decimal_column("unit_value", &row.unit_value)?,
            quantity: decimal_column("quantity", &row.quantity)?,
            percentage_value: decimal_column("percentage_value", &row.percentage_value)?,
            reference: row.reference,
            name: row.name,
            calculation_mode: row.calculation_mode,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: String,
    number: String,
    status: QuoteStatus,
    responsible_id: String,
    final_total: String,
}

impl TryFrom<SummaryRow> for QuotationSummary {
    type Error = DbError;

    fn try_from(row: SummaryRow) -> DbResult<Self> {
        Ok(QuotationSummary {
            final_total: Money::new(decimal_column("final_total", &row.final_total)?),
            id: row.id,
            number: row.number,
            status: row.status,
            responsible_id: row.responsible_id,
        })
    }
}

const SELECT_QUOTATION: &str = r#"
    SELECT
        id, number,
        customer_id, customer_name, valid_until, status,
        notes, shipping_terms, warranty_terms,
        responsible_id, responsible_name,
        gross_revenue, product_cost, total_costs,
        invoice_rate, invoice_amount, total_with_invoice,
        company_profit, profit_percent,
        tithe_rate, tithe, net_profit,
        discount_percent, discount_amount, final_total,
        created_at, updated_at
    FROM quotations
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for quotation database operations.
#[derive(Debug, Clone)]
pub struct QuotationRepository {
    pool: SqlitePool,
}

impl QuotationRepository {
    /// Creates a new QuotationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        QuotationRepository { pool }
    }

    /// Validates, computes and stores a new quotation.
    ///
    /// ## What This Does
    /// 1. Validates the header and percentages
    /// 2. Runs the calculation engine and rounds the breakdown to 2 dp
    /// 3. Takes the write lock (`BEGIN IMMEDIATE`) and assigns `#NNN` from
    ///    the current count
    /// 4. Inserts the quotation as pending, with its lines and its costs
    ///
    /// The status in `input.header` is ignored; use
    /// [`update_status`](Self::update_status) to approve or reject.
    ///
    /// ## Returns
    /// The quotation exactly as stored.
    pub async fn create(&self, input: &NewQuotation) -> DbResult<Quotation> {
        validate_new_quotation(input)?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().trunc_subsecs(6);
        let breakdown = input.breakdown().rounded();
        let header = QuotationHeader {
            status: QuoteStatus::Pending,
            ..input.header.clone()
        };

        // A deferred transaction would read the count under a snapshot it
        // cannot upgrade once another writer commits
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
            .fetch_one(&mut *tx)
            .await?;
        let number = next_quote_number(existing);

        debug!(id = %id, number = %number, "Creating quotation");

        sqlx::query(
            r#"
            INSERT INTO quotations (
                id, number,
                customer_id, customer_name, valid_until, status,
                notes, shipping_terms, warranty_terms,
                responsible_id, responsible_name,
                gross_revenue, product_cost, total_costs,
                invoice_rate, invoice_amount, total_with_invoice,
                company_profit, profit_percent,
                tithe_rate, tithe, net_profit,
                discount_percent, discount_amount, final_total,
                created_at, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?16, ?17,
                ?18, ?19,
                ?20, ?21, ?22,
                ?23, ?24, ?25,
                ?26, ?27
            )
            "#,
        )
        .bind(&id)
        .bind(&number)
        .bind(&header.customer_id)
        .bind(&header.customer_name)
        .bind(header.valid_until)
        .bind(header.status)
        .bind(&header.notes)
        .bind(&header.shipping_terms)
        .bind(&header.warranty_terms)
        .bind(&header.responsible_id)
        .bind(&header.responsible_name)
        .bind(breakdown.gross_revenue.to_persisted())
        .bind(breakdown.product_cost.to_persisted())
        .bind(breakdown.total_costs.to_persisted())
        .bind(breakdown.invoice_rate.to_persisted())
        .bind(breakdown.invoice_amount.to_persisted())
        .bind(breakdown.total_with_invoice.to_persisted())
        .bind(breakdown.company_profit.to_persisted())
        .bind(format_fixed(breakdown.profit_percent))
        .bind(breakdown.tithe_rate.to_persisted())
        .bind(breakdown.tithe.to_persisted())
        .bind(breakdown.net_profit.to_persisted())
        .bind(breakdown.discount_percent.to_persisted())
        .bind(breakdown.discount_amount.to_persisted())
        .bind(breakdown.final_total.to_persisted())
        .bind(timestamp_text(&now))
        .bind(timestamp_text(&now))
        .execute(&mut *tx)
        .await?;

        insert_lines(&mut *tx, &id, &input.items, &input.costs).await?;

        tx.commit().await?;

        info!(
            number = %number,
            final_total = %breakdown.final_total,
            "Quotation created"
        );

        Ok(Quotation {
            id,
            number,
            header,
            items: input.items.clone(),
            costs: input.costs.clone(),
            breakdown,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a quotation by ID, with lines and costs in their saved order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Quotation>> {
        let row: Option<QuotationRow> =
            sqlx::query_as(&format!("{SELECT_QUOTATION} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => self.hydrate(row).await.map(Some),
            None => Ok(None),
        }
    }

    /// Gets a quotation by its `#NNN` number.
    ///
    /// Numbers can repeat after a delete; the most recent match wins.
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<Quotation>> {
        let row: Option<QuotationRow> = sqlx::query_as(&format!(
            "{SELECT_QUOTATION} WHERE number = ?1 ORDER BY created_at DESC, id LIMIT 1"
        ))
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.hydrate(row).await.map(Some),
            None => Ok(None),
        }
    }

    /// Lists all quotations, newest first.
    pub async fn list(&self) -> DbResult<Vec<Quotation>> {
        let rows: Vec<QuotationRow> =
            sqlx::query_as(&format!("{SELECT_QUOTATION} ORDER BY created_at DESC, id"))
                .fetch_all(&self.pool)
                .await?;

        self.hydrate_all(rows).await
    }

    /// Lists quotations with the given status, newest first.
    pub async fn list_by_status(&self, status: QuoteStatus) -> DbResult<Vec<Quotation>> {
        let rows: Vec<QuotationRow> = sqlx::query_as(&format!(
            "{SELECT_QUOTATION} WHERE status = ?1 ORDER BY created_at DESC, id"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    /// Summaries of approved quotations, for commission reporting.
    pub async fn approved_summaries(&self) -> DbResult<Vec<QuotationSummary>> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT id, number, status, responsible_id, final_total
            FROM quotations
            WHERE status = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(QuoteStatus::Approved)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(QuotationSummary::try_from).collect()
    }

    /// Replaces a quotation's header, lines and costs, and recomputes its
    /// breakdown from scratch.
    ///
    /// The number, creation time and status are kept. Status changes go
    /// through [`update_status`](Self::update_status).
    pub async fn update(&self, id: &str, input: &NewQuotation) -> DbResult<Quotation> {
        validate_new_quotation(input)?;

        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Quotation", id))?;

        let now = Utc::now().trunc_subsecs(6);
        let breakdown = input.breakdown().rounded();
        let header = QuotationHeader {
            status: existing.header.status,
            ..input.header.clone()
        };

        debug!(id = %id, number = %existing.number, "Updating quotation");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE quotations SET
                customer_id = ?1, customer_name = ?2, valid_until = ?3,
                notes = ?4, shipping_terms = ?5, warranty_terms = ?6,
                responsible_id = ?7, responsible_name = ?8,
                gross_revenue = ?9, product_cost = ?10, total_costs = ?11,
                invoice_rate = ?12, invoice_amount = ?13, total_with_invoice = ?14,
                company_profit = ?15, profit_percent = ?16,
                tithe_rate = ?17, tithe = ?18, net_profit = ?19,
                discount_percent = ?20, discount_amount = ?21, final_total = ?22,
                updated_at = ?23
            WHERE id = ?24
            "#,
        )
        .bind(&header.customer_id)
        .bind(&header.customer_name)
        .bind(header.valid_until)
        .bind(&header.notes)
        .bind(&header.shipping_terms)
        .bind(&header.warranty_terms)
        .bind(&header.responsible_id)
        .bind(&header.responsible_name)
        .bind(breakdown.gross_revenue.to_persisted())
        .bind(breakdown.product_cost.to_persisted())
        .bind(breakdown.total_costs.to_persisted())
        .bind(breakdown.invoice_rate.to_persisted())
        .bind(breakdown.invoice_amount.to_persisted())
        .bind(breakdown.total_with_invoice.to_persisted())
        .bind(breakdown.company_profit.to_persisted())
        .bind(format_fixed(breakdown.profit_percent))
        .bind(breakdown.tithe_rate.to_persisted())
        .bind(breakdown.tithe.to_persisted())
        .bind(breakdown.net_profit.to_persisted())
        .bind(breakdown.discount_percent.to_persisted())
        .bind(breakdown.discount_amount.to_persisted())
        .bind(breakdown.final_total.to_persisted())
        .bind(timestamp_text(&now))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM quotation_items WHERE quotation_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM quotation_costs WHERE quotation_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_lines(&mut *tx, id, &input.items, &input.costs).await?;

        tx.commit().await?;

        info!(
            number = %existing.number,
            final_total = %breakdown.final_total,
            "Quotation updated"
        );

        Ok(Quotation {
            id: existing.id,
            number: existing.number,
            header,
            items: input.items.clone(),
            costs: input.costs.clone(),
            breakdown,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Moves a quotation to a new status.
    ///
    /// Approved and rejected quotations cannot flip directly into each
    /// other; reopen them as pending first.
    pub async fn update_status(&self, id: &str, status: QuoteStatus) -> DbResult<()> {
        let current: Option<(String, QuoteStatus)> =
            sqlx::query_as("SELECT number, status FROM quotations WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let (number, from) = current.ok_or_else(|| DbError::not_found("Quotation", id))?;

        from.transition(&number, status)?;

        sqlx::query("UPDATE quotations SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status)
            .bind(timestamp_text(&Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(number = %number, from = %from, to = %status, "Quotation status changed");

        Ok(())
    }

    /// Deletes a quotation. Lines and costs go with it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting quotation");

        let result = sqlx::query("DELETE FROM quotations WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Quotation", id));
        }

        Ok(())
    }

    /// Number of stored quotations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Loading helpers
    // -------------------------------------------------------------------------

    async fn hydrate(&self, row: QuotationRow) -> DbResult<Quotation> {
        let items: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT product_reference, product_name, quantity, unit_cost, unit_sale_price
            FROM quotation_items
            WHERE quotation_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let costs: Vec<CostRow> = sqlx::query_as(
            r#"
            SELECT reference, name, calculation_mode, unit_value, quantity, percentage_value
            FROM quotation_costs
            WHERE quotation_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let items = items
            .into_iter()
            .map(LineItem::try_from)
            .collect::<DbResult<Vec<_>>>()?;
        let costs = costs
            .into_iter()
            .map(CostEntry::try_from)
            .collect::<DbResult<Vec<_>>>()?;

        row.into_quotation(items, costs)
    }

    async fn hydrate_all(&self, rows: Vec<QuotationRow>) -> DbResult<Vec<Quotation>> {
        let mut quotations = Vec::with_capacity(rows.len());
        for row in rows {
            quotations.push(self.hydrate(row).await?);
        }
        Ok(quotations)
    }
}

/// Inserts product lines and cost entries in their display order.
async fn insert_lines(
    conn: &mut SqliteConnection,
    quotation_id: &str,
    items: &[LineItem],
    costs: &[CostEntry],
) -> DbResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quotation_items (
                id, quotation_id, position,
                product_reference, product_name,
                quantity, unit_cost, unit_sale_price,
                line_revenue, line_cost
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(quotation_id)
        .bind(position as i64)
        .bind(&item.product_reference)
        .bind(&item.product_name)
        .bind(item.quantity.to_string())
        .bind(item.unit_cost.to_string())
        .bind(item.unit_sale_price.to_string())
        .bind(item.line_revenue().to_persisted())
        .bind(item.line_cost().to_persisted())
        .execute(&mut *conn)
        .await?;
    }

    for (position, cost) in costs.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO quotation_costs (
                id, quotation_id, position,
                reference, name, calculation_mode,
                unit_value, quantity, percentage_value,
                total_value
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(quotation_id)
        .bind(position as i64)
        .bind(&cost.reference)
        .bind(&cost.name)
        .bind(cost.calculation_mode)
        .bind(cost.unit_value.to_string())
        .bind(cost.quantity.to_string())
        .bind(cost.percentage_value.to_string())
        .bind(cost.total_value().to_persisted())
        .execute(&mut *conn)
        .await?;
    }

    debug!(
        quotation_id = %quotation_id,
        items = items.len(),
        costs = costs.len(),
        "Lines written"
    );

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use rust_decimal_macros::dec;
    use turf_core::Role;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn header(responsible_id: &str) -> QuotationHeader {
        QuotationHeader {
            customer_id: "c-1".into(),
            customer_name: "Arena Society".into(),
            valid_until: NaiveDate::from_ymd_opt(2026, 12, 31),
            responsible_id: responsible_id.into(),
            responsible_name: "Ana".into(),
            shipping_terms: Some("CIF".into()),
            ..Default::default()
        }
    }

    /// Two-item scenario: revenue 560, product cost 240, freight 100.
    fn scenario(responsible_id: &str) -> NewQuotation {
        NewQuotation {
            header: header(responsible_id),
            items: vec![
                LineItem::new("A", "Grass 40mm", 20, 10, 25),
                LineItem::new("B", "Shock pad", 5, 8, 12),
            ],
            costs: vec![CostEntry::fixed("FRT", "Freight", 50, 2)],
            discount_percent: dec!(10),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_numbers() {
        let repo = db().await.quotations();

        let first = repo.create(&scenario("u1")).await.unwrap();
        let second = repo.create(&scenario("u1")).await.unwrap();

        assert_eq!(first.number, "#001");
        assert_eq!(second.number, "#002");
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_stores_rounded_breakdown() {
        let repo = db().await.quotations();
        let created = repo.create(&scenario("u1")).await.unwrap();

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        let b = loaded.breakdown;

        assert_eq!(b.gross_revenue.amount(), dec!(560));
        assert_eq!(b.total_costs.amount(), dec!(340));
        assert_eq!(b.invoice_amount.amount(), dec!(28));
        assert_eq!(b.company_profit.amount(), dec!(192));
        assert_eq!(b.profit_percent, dec!(34.29));
        assert_eq!(b.tithe.amount(), dec!(19.20));
        assert_eq!(b.net_profit.amount(), dec!(172.80));
        assert_eq!(b.discount_amount.amount(), dec!(56));
        assert_eq!(b.final_total.amount(), dec!(504));

        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_money_columns_are_two_decimal_text() {
        let db = db().await;
        let created = db.quotations().create(&scenario("u1")).await.unwrap();

        let (tithe, profit_percent): (String, String) =
            sqlx::query_as("SELECT tithe, profit_percent FROM quotations WHERE id = ?1")
                .bind(&created.id)
                .fetch_one(db.pool())
                .await
                .unwrap();

        assert_eq!(tithe, "19.20");
        assert_eq!(profit_percent, "34.29");
    }

    #[tokio::test]
    async fn test_lines_keep_order() {
        let repo = db().await.quotations();
        let created = repo.create(&scenario("u1")).await.unwrap();

        let loaded = repo.get_by_number("#001").await.unwrap().unwrap();
        assert_eq!(loaded.id, created.id);
        assert_eq!(loaded.items[0].product_reference, "A");
        assert_eq!(loaded.items[1].product_reference, "B");
        assert_eq!(loaded.costs[0].calculation_mode, CalculationMode::Fixed);
        assert_eq!(loaded.header.valid_until, NaiveDate::from_ymd_opt(2026, 12, 31));

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], loaded);
    }

    #[tokio::test]
    async fn test_create_is_always_pending() {
        let repo = db().await.quotations();
        let mut input = scenario("u1");
        input.header.status = QuoteStatus::Approved;

        let created = repo.create(&input).await.unwrap();
        assert_eq!(created.header.status, QuoteStatus::Pending);

        assert!(repo.approved_summaries().await.unwrap().is_empty());
        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.header.status, QuoteStatus::Pending);
    }

    #[tokio::test]
    async fn test_fractional_discount_reloads_as_created() {
        let repo = db().await.quotations();
        let mut input = scenario("u1");
        input.discount_percent = dec!(12.345);

        let created = repo.create(&input).await.unwrap();
        assert_eq!(created.breakdown.discount_percent.value(), dec!(12.35));
        assert_eq!(created.breakdown.discount_amount.amount(), dec!(69.16));

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("quotes.db")).max_connections(8);
        let repo = Database::new(config).await.unwrap().quotations();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(&scenario("u1")).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.unwrap().unwrap().number);
        }
        numbers.sort();

        let expected: Vec<String> = (1..=16).map(|n| format!("#{n:03}")).collect();
        assert_eq!(numbers, expected);
        assert_eq!(repo.count().await.unwrap(), 16);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_header() {
        let repo = db().await.quotations();
        let mut input = scenario("u1");
        input.header.customer_name = "  ".into();

        let err = repo.create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_recomputes_and_replaces_lines() {
        let repo = db().await.quotations();
        let created = repo.create(&scenario("u1")).await.unwrap();

        let mut edited = scenario("u1");
        edited.items.pop();
        edited.costs.push(CostEntry::percentage("INS", "Insurance", 200, 10));
        edited.discount_percent = dec!(0);

        let updated = repo.update(&created.id, &edited).await.unwrap();
        assert_eq!(updated.number, "#001");
        assert_eq!(updated.breakdown.gross_revenue.amount(), dec!(500));
        // 200 product + 100 freight + 20 insurance
        assert_eq!(updated.breakdown.total_costs.amount(), dec!(320));
        assert_eq!(updated.breakdown.final_total.amount(), dec!(500));

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.costs.len(), 2);
        assert_eq!(loaded.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = db().await.quotations();
        let err = repo.update("missing", &scenario("u1")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let repo = db().await.quotations();
        let q = repo.create(&scenario("u1")).await.unwrap();

        repo.update_status(&q.id, QuoteStatus::Approved).await.unwrap();
        let err = repo.update_status(&q.id, QuoteStatus::Rejected).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(turf_core::CoreError::InvalidStatusTransition { .. })
        ));

        repo.update_status(&q.id, QuoteStatus::Pending).await.unwrap();
        repo.update_status(&q.id, QuoteStatus::Rejected).await.unwrap();

        let rejected = repo.list_by_status(QuoteStatus::Rejected).await.unwrap();
        assert_eq!(rejected.len(), 1);
        assert!(repo.list_by_status(QuoteStatus::Approved).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_status() {
        let repo = db().await.quotations();
        let q = repo.create(&scenario("u1")).await.unwrap();
        repo.update_status(&q.id, QuoteStatus::Approved).await.unwrap();

        let updated = repo.update(&q.id, &scenario("u1")).await.unwrap();
        assert_eq!(updated.header.status, QuoteStatus::Approved);
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let db = db().await;
        let repo = db.quotations();
        let q = repo.create(&scenario("u1")).await.unwrap();

        repo.delete(&q.id).await.unwrap();
        assert!(repo.get_by_id(&q.id).await.unwrap().is_none());

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotation_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);

        assert!(matches!(repo.delete(&q.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_number_can_repeat_after_delete() {
        let repo = db().await.quotations();
        let first = repo.create(&scenario("u1")).await.unwrap();
        repo.create(&scenario("u1")).await.unwrap();

        repo.delete(&first.id).await.unwrap();
        let third = repo.create(&scenario("u1")).await.unwrap();
        assert_eq!(third.number, "#002");
    }

    #[tokio::test]
    async fn test_commission_report_counts_approved_only() {
        let db = db().await;
        let ana = db
            .salespeople()
            .insert("Ana", Role::Salesperson, dec!(5))
            .await
            .unwrap();

        let repo = db.quotations();
        let approved = repo.create(&scenario(&ana.id)).await.unwrap();
        let rejected = repo.create(&scenario(&ana.id)).await.unwrap();
        repo.create(&scenario(&ana.id)).await.unwrap();

        repo.update_status(&approved.id, QuoteStatus::Approved).await.unwrap();
        repo.update_status(&rejected.id, QuoteStatus::Rejected).await.unwrap();

        let report = db.commission_report().await.unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].approved_count, 1);
        assert_eq!(report[0].approved_total.amount(), dec!(504));
        assert_eq!(report[0].commission.amount(), dec!(25.20));
    }
}
