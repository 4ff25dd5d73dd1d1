//! # Seed Data Generator
//!
//! Populates the database with categories and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database (./kasir.db)
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//!
//! # Generate several sizes per product
//! cargo run -p kasir-db --bin seed -- --variants 3
//! ```
//!
//! ## Generated Data
//! One category per entry of [`CATALOG`], each with a handful of everyday
//! warung products. Prices are whole Rupiah, stock 0 - 100.

use std::env;

use kasir_core::validation::{validate_category_input, validate_product_input};
use kasir_core::{CategoryInput, ProductInput};
use kasir_db::{CatalogStore, Database, DbConfig};

/// Categories and their products with base prices.
const CATALOG: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Makanan",
        "Makanan siap saji dan instan",
        &[
            ("Indomie Goreng", 3_500),
            ("Indomie Soto", 3_200),
            ("Nasi Goreng", 15_000),
            ("Roti Tawar", 14_000),
            ("Sarden Kaleng", 12_500),
        ],
    ),
    (
        "Minuman",
        "Minuman dingin dan panas",
        &[
            ("Teh Botol", 3_000),
            ("Aqua 600ml", 4_000),
            ("Kopi Kapal Api", 1_500),
            ("Susu Ultra", 6_500),
            ("Pocari Sweat", 7_500),
        ],
    ),
    (
        "Camilan",
        "Keripik, biskuit, dan permen",
        &[
            ("Chitato", 10_000),
            ("Oreo", 9_000),
            ("Kacang Garuda", 8_000),
            ("Permen Kopiko", 500),
        ],
    ),
    (
        "Kebutuhan Rumah",
        "Sabun, deterjen, dan perlengkapan",
        &[
            ("Sabun Lifebuoy", 4_500),
            ("Rinso 800g", 22_000),
            ("Pasta Gigi Pepsodent", 11_000),
        ],
    ),
];

/// Size suffixes and price multipliers (percent).
const VARIANTS: &[(&str, i64)] = &[("", 100), ("Besar", 180), ("Jumbo", 250)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir.db");
    let mut variants: usize = 1;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--variants" | "-v" => {
                if i + 1 < args.len() {
                    variants = args[i + 1].parse().unwrap_or(1).clamp(1, VARIANTS.len());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>        Database file path (default: ./kasir.db)");
                println!(
                    "  -v, --variants <N>     Sizes per product, 1-{} (default: 1)",
                    VARIANTS.len()
                );
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path).min_connections(1)).await?;
    let store = db.store();

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = store.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0usize;
    let start = std::time::Instant::now();

    for (seed, (category_name, description, products)) in CATALOG.iter().enumerate() {
        let category = store
            .create_category(&validate_category_input(&CategoryInput {
                name: category_name.to_string(),
                description: description.to_string(),
            })?)
            .await?;

        for (product_idx, (name, base_price)) in products.iter().enumerate() {
            for (suffix, multiplier) in VARIANTS.iter().take(variants) {
                let input = generate_product(
                    name,
                    suffix,
                    base_price * multiplier / 100,
                    seed * 100 + product_idx,
                    category.id,
                );

                if let Err(e) = store.create_product(&validate_product_input(&input)?).await {
                    eprintln!("Failed to insert {}: {}", input.name, e);
                    continue;
                }
                generated += 1;
            }
        }

        println!("  {} ({} products)", category.name, products.len() * variants);
    }

    println!();
    println!(
        "✓ Generated {} products in {:?}",
        generated,
        start.elapsed()
    );

    db.close().await;
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one product input with pseudo-random stock.
fn generate_product(
    name: &str,
    suffix: &str,
    price: i64,
    seed: usize,
    category_id: i64,
) -> ProductInput {
    let name = if suffix.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, suffix)
    };

    ProductInput {
        name,
        price,
        stock: ((seed * 37) % 101) as i64,
        category_id: Some(category_id),
    }
}
