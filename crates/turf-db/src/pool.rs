//! # Database Pool Management
//!
//! Connection pool creation and configuration for SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  Server Startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::from_env() ← TURF_DB_PATH, TURF_DB_MAX_CONNECTIONS, ...     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await ← Create pool + run migrations            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │            SqlitePool                    │                           │
//! │  │  ┌─────┐ ┌─────┐ ┌─────┐ ┌─────┐       │                           │
//! │  │  │Conn1│ │Conn2│ │Conn3│ │Conn4│ ...   │  (max_connections)        │
//! │  │  └─────┘ └─────┘ └─────┘ └─────┘       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.quotations() / db.salespeople() / db.commission_report()           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! WAL mode is enabled so readers (quotation lists, reports) never block the
//! writer saving a quotation.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};
use turf_core::{summarize_commissions, CommissionReport};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::quotation::QuotationRepository;
use crate::repository::salesperson::SalespersonRepository;

/// Default database file when `TURF_DB_PATH` is not set.
pub const DEFAULT_DB_PATH: &str = "turf.db";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/var/lib/turf/turf.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 5
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// How long a writer waits for the lock held by another writer.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// ## Variables
    /// ```text
    /// TURF_DB_PATH             database file        (default: turf.db)
    /// TURF_DB_MAX_CONNECTIONS  pool size            (default: 5)
    /// TURF_DB_RUN_MIGRATIONS   true / false         (default: true)
    /// ```
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are an
    /// error so a typo doesn't silently change behavior.
    pub fn from_env() -> DbResult<Self> {
        let path = env::var("TURF_DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        DbConfig::new(path).with_overrides(|name| env::var(name).ok())
    }

    /// Applies `TURF_DB_MAX_CONNECTIONS` and `TURF_DB_RUN_MIGRATIONS` from
    /// `lookup` on top of this configuration.
    ///
    /// A pool size below the current minimum lowers the minimum with it.
    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        if let Some(raw) = lookup("TURF_DB_MAX_CONNECTIONS") {
            let max = raw.trim().parse::<u32>().map_err(|_| {
                DbError::InvalidConfig(format!("TURF_DB_MAX_CONNECTIONS must be a number, got '{raw}'"))
            })?;
            if max == 0 {
                return Err(DbError::InvalidConfig(
                    "TURF_DB_MAX_CONNECTIONS must be at least 1".to_string(),
                ));
            }
            let min = self.min_connections.min(max);
            self = self.max_connections(max).min_connections(min);
        }

        if let Some(raw) = lookup("TURF_DB_RUN_MIGRATIONS") {
            self = self.run_migrations(parse_flag("TURF_DB_RUN_MIGRATIONS", &raw)?);
        }

        Ok(self)
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the busy timeout for lock contention between writers.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> DbResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DbError::InvalidConfig(format!(
            "{name} must be true or false, got '{raw}'"
        ))),
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cheap to clone: clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Creates a new database connection pool.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite:
    ///    - WAL mode for concurrent reads
    ///    - NORMAL synchronous
    ///    - Busy timeout so concurrent saves wait instead of failing
    ///    - Foreign keys enabled (line tables cascade on delete)
    /// 3. Creates the connection pool
    /// 4. Runs migrations (if enabled)
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // SQLite has them disabled by default
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            busy_timeout_ms = config.busy_timeout.as_millis() as u64,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the quotation repository.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let approved = db.quotations().list_by_status(QuoteStatus::Approved).await?;
    /// ```
    pub fn quotations(&self) -> QuotationRepository {
        QuotationRepository::new(self.pool.clone())
    }

    /// Returns the salesperson repository.
    pub fn salespeople(&self) -> SalespersonRepository {
        SalespersonRepository::new(self.pool.clone())
    }

    /// Commission owed per salesperson over approved quotations.
    ///
    /// Pending and rejected quotations never count.
    pub async fn commission_report(&self) -> DbResult<Vec<CommissionReport>> {
        let approved = self.quotations().approved_summaries().await?;
        let people = self.salespeople().list_all().await?;

        debug!(
            approved = approved.len(),
            salespeople = people.len(),
            "Building commission report"
        );

        Ok(summarize_commissions(&approved, &people))
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
