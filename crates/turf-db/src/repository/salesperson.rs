//! # Salesperson Repository
//!
//! Staff who can be responsible for quotations, with their commission rate.

use chrono::{SubsecRound, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{decimal_column, timestamp_column, timestamp_text};
use turf_core::validation::{validate_commission_percent, validate_person_name};
use turf_core::{Percent, Role, Salesperson};

/// Raw `salespeople` row. Decimal and timestamp columns are TEXT.
#[derive(Debug, sqlx::FromRow)]
struct SalespersonRow {
    id: String,
    name: String,
    role: Role,
    commission_percent: String,
    is_active: bool,
    created_at: String,
}

impl TryFrom<SalespersonRow> for Salesperson {
    type Error = DbError;

    fn try_from(row: SalespersonRow) -> DbResult<Self> {
        Ok(Salesperson {
            commission_percent: Percent::from_decimal(decimal_column(
                "commission_percent",
                &row.commission_percent,
            )?),
            created_at: timestamp_column("created_at", &row.created_at)?,
            id: row.id,
            name: row.name,
            role: row.role,
            is_active: row.is_active,
        })
    }
}

const SELECT_SALESPERSON: &str = r#"
    SELECT id, name, role, commission_percent, is_active, created_at
    FROM salespeople
"#;

/// Repository for salesperson database operations.
#[derive(Debug, Clone)]
pub struct SalespersonRepository {
    pool: SqlitePool,
}

impl SalespersonRepository {
    /// Creates a new SalespersonRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalespersonRepository { pool }
    }

    /// Inserts a new active salesperson and returns it.
    ///
    /// ## Arguments
    /// * `name` - Display name
    /// * `role` - Admin or Salesperson
    /// * `commission_percent` - 0 to 100
    pub async fn insert(
        &self,
        name: &str,
        role: Role,
        commission_percent: Decimal,
    ) -> DbResult<Salesperson> {
        validate_person_name(name)?;
        validate_commission_percent(commission_percent)?;

        let person = Salesperson {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            role,
            commission_percent: Percent::from_decimal(commission_percent),
            is_active: true,
            created_at: Utc::now().trunc_subsecs(6),
        };

        debug!(id = %person.id, name = %person.name, "Inserting salesperson");

        sqlx::query(
            r#"
            INSERT INTO salespeople (id, name, role, commission_percent, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&person.id)
        .bind(&person.name)
        .bind(person.role)
        .bind(person.commission_percent.to_persisted())
        .bind(person.is_active)
        .bind(timestamp_text(&person.created_at))
        .execute(&self.pool)
        .await?;

        Ok(person)
    }

    /// Gets a salesperson by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Salesperson>> {
        let row: Option<SalespersonRow> =
            sqlx::query_as(&format!("{SELECT_SALESPERSON} WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Salesperson::try_from).transpose()
    }

    /// Lists active salespeople ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Salesperson>> {
        let rows: Vec<SalespersonRow> =
            sqlx::query_as(&format!("{SELECT_SALESPERSON} WHERE is_active = 1 ORDER BY name, id"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Salesperson::try_from).collect()
    }

    /// Lists everyone, including deactivated staff.
    ///
    /// Commission reporting uses this: a person who left still earned
    /// commission on the quotations they closed.
    pub async fn list_all(&self) -> DbResult<Vec<Salesperson>> {
        let rows: Vec<SalespersonRow> =
            sqlx::query_as(&format!("{SELECT_SALESPERSON} ORDER BY name, id"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Salesperson::try_from).collect()
    }

    /// Changes a salesperson's commission rate.
    ///
    /// Applies to every approved quotation in the next report; saved
    /// quotations store totals, not commissions.
    pub async fn update_commission(&self, id: &str, commission_percent: Decimal) -> DbResult<()> {
        validate_commission_percent(commission_percent)?;

        debug!(id = %id, commission = %commission_percent, "Updating commission");

        let result = sqlx::query("UPDATE salespeople SET commission_percent = ?1 WHERE id = ?2")
            .bind(Percent::from_decimal(commission_percent).to_persisted())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Salesperson", id));
        }

        Ok(())
    }

    /// Marks a salesperson inactive. They stay in reports.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating salesperson");

        let result = sqlx::query("UPDATE salespeople SET is_active = 0 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Salesperson", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
