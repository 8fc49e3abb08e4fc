//! # Seed Data Generator
//!
//! Populates the database with demo salespeople and quotations, then prints
//! each breakdown as an admin and as the responsible salesperson, followed by
//! the commission report.
//!
//! ## Usage
//! ```bash
//! # Uses TURF_DB_PATH (default: turf.db)
//! cargo run -p turf-db --bin seed
//!
//! # Specify database path
//! cargo run -p turf-db --bin seed -- --db ./data/turf_dev.db
//!
//! # More logging
//! RUST_LOG=debug cargo run -p turf-db --bin seed
//! ```

use rust_decimal::Decimal;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;
use turf_core::{
    BreakdownView, CostEntry, LineItem, NewQuotation, QuotationHeader, QuoteStatus, Role,
    Viewer,
};
use turf_db::{Database, DbConfig};

/// Demo staff: (name, role, commission %).
const SALESPEOPLE: &[(&str, Role, i64)] = &[
    ("Ana Souza", Role::Salesperson, 5),
    ("Bruno Lima", Role::Salesperson, 3),
    ("Carla Dias", Role::Admin, 0),
];

/// Demo products: (reference, name, unit cost, unit sale price).
const PRODUCTS: &[(&str, &str, i64, i64)] = &[
    ("GRASS-40", "Synthetic grass 40mm", 38, 69),
    ("GRASS-50", "Synthetic grass 50mm", 45, 82),
    ("PAD-10", "Shock pad 10mm", 12, 21),
    ("SAND-SIL", "Silica sand infill (bag)", 9, 16),
    ("GLUE-PU", "Polyurethane adhesive (kg)", 22, 35),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config = DbConfig::from_env()?;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Turf Quote Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $TURF_DB_PATH or turf.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Turf Quote Seed Data Generator");
    println!("=================================");
    println!("Database: {}", config.database_path.display());
    println!();

    let db = Database::new(config).await?;

    let existing = db.quotations().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} quotations", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut people = Vec::with_capacity(SALESPEOPLE.len());
    for (name, role, commission) in SALESPEOPLE {
        let person = db
            .salespeople()
            .insert(name, *role, Decimal::from(*commission))
            .await?;
        println!("✓ {} ({:?}, {}% commission)", person.name, person.role, commission);
        people.push(person);
    }

    let sellers: Vec<_> = people.iter().filter(|p| p.role == Role::Salesperson).collect();
    let admin = Viewer::admin("admin", "Office");

    println!();
    for n in 0..6usize {
        let seller = sellers[n % sellers.len()];
        let quote = demo_quotation(n, &seller.id, &seller.name);
        let saved = db.quotations().create(&quote).await?;

        let status = match n % 3 {
            0 => QuoteStatus::Approved,
            1 => QuoteStatus::Rejected,
            _ => QuoteStatus::Pending,
        };
        db.quotations().update_status(&saved.id, status).await?;

        let b = &saved.breakdown;
        println!("{} for {} [{}]", saved.number, saved.header.customer_name, status);
        println!("  gross revenue   {:>12}", b.gross_revenue);
        println!("  total costs     {:>12}", b.total_costs);
        println!("  invoice (5%)    {:>12}", b.invoice_amount);
        println!("  company profit  {:>12}  ({}%)", b.company_profit, b.profit_percent);
        println!("  tithe (10%)     {:>12}", b.tithe);
        println!("  net profit      {:>12}", b.net_profit);
        println!("  discount        {:>12}  ({})", b.discount_amount, b.discount_percent);
        println!("  final total     {:>12}", b.final_total);

        let seller_view = BreakdownView::for_viewer(b, &Viewer::from(seller));
        println!("  as {}: {}", seller.name, serde_json::to_string(&seller_view)?);
        let admin_view = BreakdownView::for_viewer(b, &admin);
        info!(number = %saved.number, total = %admin_view.final_total(), "Seeded quotation");
        println!();
    }

    println!("Commission report (approved quotations only)");
    println!("--------------------------------------------");
    for report in db.commission_report().await? {
        println!(
            "  {:<12} {:>2} approved  total {:>12}  commission {:>10} ({})",
            report.salesperson_name,
            report.approved_count,
            report.approved_total,
            report.commission,
            report.commission_percent
        );
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: INFO level, sqlx quiet
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,turf_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Builds a quotation with two or three product lines and a couple of costs.
fn demo_quotation(n: usize, responsible_id: &str, responsible_name: &str) -> NewQuotation {
    let area = 150 + (n as i64) * 85;
    let (grass_ref, grass_name, grass_cost, grass_price) = PRODUCTS[n % 2];
    let (pad_ref, pad_name, pad_cost, pad_price) = PRODUCTS[2];
    let (sand_ref, sand_name, sand_cost, sand_price) = PRODUCTS[3];

    let mut items = vec![
        LineItem::new(grass_ref, grass_name, area, grass_cost, grass_price),
        LineItem::new(pad_ref, pad_name, area, pad_cost, pad_price),
    ];
    if n % 2 == 0 {
        items.push(LineItem::new(sand_ref, sand_name, area / 10, sand_cost, sand_price));
    }

    let costs = vec![
        CostEntry::fixed("FRT", "Freight", 450, 1),
        CostEntry::fixed("INST", "Installation crew (day)", 1200, 1 + (n as i64) % 3),
        CostEntry::percentage("INS", "Transport insurance", 900, 2),
    ];

    NewQuotation {
        header: QuotationHeader {
            customer_id: format!("cust-{:03}", n + 1),
            customer_name: format!("Arena {} Sports Club", n + 1),
            notes: Some("Price includes leveling of the base.".to_string()),
            shipping_terms: Some("Delivery in 15 days".to_string()),
            warranty_terms: Some("8 years against UV fading".to_string()),
            responsible_id: responsible_id.to_string(),
            responsible_name: responsible_name.to_string(),
            ..Default::default()
        },
        items,
        costs,
        discount_percent: Decimal::from((n as i64 % 3) * 5),
    }
}
