//! # turf-db: Database Layer for Turf Quote
//!
//! This crate stores quotations and salespeople in SQLite, using sqlx for
//! async operations. All numbers it persists come from the turf-core engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Turf Quote Data Flow                              │
//! │                                                                         │
//! │  Save button (editing surface)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     turf-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │   │  (embedded)  │  │   │
//! │  │   │               │    │ QuotationRepo  │   │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ SalespersonRepo│   │              │  │   │
//! │  │   └───────────────┘    └───────┬────────┘   └──────────────┘  │   │
//! │  │                                │ compute_breakdown()           │   │
//! │  │                                ▼                               │   │
//! │  │                           turf-core                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (turf.db)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded bootstrap schema
//! - [`error`] - Database error types
//! - [`repository`] - Quotation and salesperson repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use turf_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let quotation = db.quotations().create(&new_quotation).await?;
//! println!("{} → {}", quotation.number, quotation.total());
//!
//! let report = db.commission_report().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::quotation::QuotationRepository;
pub use repository::salesperson::SalespersonRepository;
