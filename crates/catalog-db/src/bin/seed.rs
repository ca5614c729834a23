//! # Seed Data Generator
//!
//! Populates a catalog database with demo categories, products and variants
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by CATALOG_DATABASE_PATH (default ./catalog.db)
//! cargo run -p catalog-db --bin seed
//!
//! # Limit the number of base products
//! cargo run -p catalog-db --bin seed -- --count 20
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! ## Generated Data
//! - One category per entry in [`CATEGORIES`], plus an inactive archive
//! - Base products with SKU `{CODE}-{NAME}-{INDEX}`
//! - Size variants under every base product, linked through `parent_id`
//! - Deterministic prices and stock; some products start out of stock

use std::env;

use catalog_core::{Category, Money, NewCategory, NewProduct, Product};
use catalog_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Category code, category name, base product names.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "BEV",
        "Beverages",
        &[
            "Cola",
            "Lemonade",
            "Iced Tea",
            "Orange Juice",
            "Sparkling Water",
            "Cold Brew",
        ],
    ),
    (
        "SNK",
        "Snacks",
        &["Potato Chips", "Pretzels", "Trail Mix", "Granola Bar", "Popcorn"],
    ),
    ("APP", "Apparel", &["Crew Tee", "Hoodie", "Beanie", "Canvas Tote"]),
    (
        "GRO",
        "Grocery",
        &["Basmati Rice", "Penne Pasta", "Olive Oil", "Honey", "Rolled Oats"],
    ),
];

/// Variant label, price addon in cents, measurement.
const SIZES: &[(&str, i64, &str)] = &[
    ("Small", 0, "pcs"),
    ("Large", 150, "pcs"),
    ("Family", 400, "pack"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env()?;
    let mut count: usize = usize::MAX;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if let Some(raw) = args.get(i + 1) {
                    count = raw.parse()?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if let Some(path) = args.get(i + 1) {
                    config.database_path = path.into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of base products to generate (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: $CATALOG_DATABASE_PATH or ./catalog.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %config.database_path.display(), "Seeding catalog database");

    let db = Database::new(config).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Database already has products; skipping seed to avoid duplicates"
        );
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0usize;
    let mut variants = 0usize;

    for (code, name, products) in CATEGORIES {
        let uid = format!("cat-{}", code.to_lowercase());
        let category = Category::new(NewCategory::new(*name).with_uid(uid))?;
        let category = db.categories().insert(&category).await?;

        for (index, product_name) in products.iter().enumerate() {
            if generated >= count {
                break;
            }

            let seed = generated * 31 + index;
            let base = Product::new(base_product(&category, code, product_name, seed))?;
            let base = db.products().insert(&base).await?;
            generated += 1;

            for (size, addon, measurement) in SIZES {
                let variant = NewProduct::new(
                    &category.id,
                    format!("{}-{}", base.sku, size.to_uppercase()),
                    format!("{} {}", product_name, size),
                    base.price() + Money::from_cents(*addon),
                )
                .with_parent(&base.id)
                .with_measurement(*measurement)
                .with_stock(((seed + addon.unsigned_abs() as usize) % 25) as i64);

                db.products().insert(&Product::new(variant)?).await?;
                variants += 1;
            }
        }
    }

    let archive = Category::new(
        NewCategory::new("Archive")
            .with_description("Discontinued lines")
            .inactive(),
    )?;
    db.categories().insert(&archive).await?;

    info!(
        products = generated,
        variants,
        elapsed = ?start.elapsed(),
        "Generated catalog"
    );

    // Quick sanity pass over what was written
    let available = db.products().list_available().await?;
    let active = db.categories().list_active().await?;
    info!(
        available = available.len(),
        active_categories = active.len(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Builds a base product with deterministic price and stock.
fn base_product(category: &Category, code: &str, name: &str, seed: usize) -> NewProduct {
    let short: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(4)
        .collect::<String>()
        .to_uppercase();
    let sku = format!("{}-{}-{:03}", code, short, seed);

    // $1.99 - $9.98
    let price = Money::from_cents(199 + ((seed * 17) % 800) as i64);

    // Every fifth product starts out of stock
    let stock = if seed % 5 == 0 { 0 } else { (seed % 101) as i64 };

    NewProduct::new(&category.id, sku, name, price).with_stock(stock)
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` overrides the default `info,sqlx=warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
