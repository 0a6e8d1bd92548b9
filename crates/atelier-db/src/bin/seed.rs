//! # Seed Data Generator
//!
//! Populates the database with artisans and products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p atelier-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p atelier-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p atelier-db --bin seed -- --db ./data/app.sqlite
//! ```
//!
//! ## Generated Data
//! One artisan per craft, each supplying products in that craft's category:
//! - Ceramics (bowls, mugs, vases)
//! - Woodwork (spoons, boards, boxes)
//! - Textiles (scarves, rugs, cushions)
//! - Jewelry (rings, pendants, earrings)
//! - Leather (wallets, belts, bags)
//!
//! Each product has a price between 8.00 and 87.50, a cost of 40-60% of the
//! price and a stock of 0-40, so a fresh database already has low-stock rows.

use atelier_core::{ArtisanDraft, ProductDraft};
use atelier_db::{Database, DbConfig};
use std::env;

/// Crafts with their artisan and product base names.
const CRAFTS: &[(&str, &str, &[&str])] = &[
    ("ceramics", "Clay & Kiln Studio", &["Bowl", "Mug", "Vase", "Plate", "Teapot"]),
    ("woodwork", "Oak Hollow Works", &["Spoon", "Cutting Board", "Box", "Bowl", "Comb"]),
    ("textiles", "Loom House", &["Scarf", "Rug", "Cushion", "Throw", "Tote"]),
    ("jewelry", "Silver Thread", &["Ring", "Pendant", "Earrings", "Bracelet", "Brooch"]),
    ("leather", "Saddle Row", &["Wallet", "Belt", "Bag", "Key Fob", "Journal Cover"]),
];

/// Finishes that multiply the base product names.
const FINISHES: &[&str] = &[
    "Natural", "Indigo", "Ash", "Ochre", "Charcoal", "Sage", "Rust", "Ivory",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./data/app.sqlite");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Atelier Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./data/app.sqlite)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Atelier Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating artisans and products...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut artisans = Vec::with_capacity(CRAFTS.len());

    for (craft_idx, (craft, studio, _)) in CRAFTS.iter().enumerate() {
        let artisan = db
            .artisans()
            .create(&ArtisanDraft {
                name: studio.to_string(),
                contact_info: Some(format!(
                    "hello@{}.example",
                    studio.to_lowercase().replace([' ', '&'], "")
                )),
                craft_types: Some(craft.to_string()),
                lead_time_days: 3 + craft_idx as i64 * 2,
            })
            .await?;
        artisans.push(artisan.id);
    }

    'outer: for round in 0.. {
        let finish = FINISHES[round % FINISHES.len()];
        let series = round / FINISHES.len();

        for (craft_idx, (craft, _, items)) in CRAFTS.iter().enumerate() {
            for (item_idx, item) in items.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let draft = generate_product(
                    craft,
                    item,
                    finish,
                    series,
                    artisans[craft_idx],
                    generated + item_idx,
                );

                db.products().create(&draft).await?;
                generated += 1;

                if generated % 100 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} artisans and {} products in {:?}",
        artisans.len(),
        generated,
        elapsed
    );

    let low = db.reports().low_stock(atelier_core::DEFAULT_LOW_STOCK_THRESHOLD).await?;
    println!("  Low-stock products: {}", low.items.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random figures.
fn generate_product(
    craft: &str,
    item: &str,
    finish: &str,
    series: usize,
    artisan_id: i64,
    seed: usize,
) -> ProductDraft {
    let name = if series == 0 {
        format!("{} {}", finish, item)
    } else {
        format!("{} {} No. {}", finish, item, series + 1)
    };

    // 8.00 - 87.50 in half-unit steps
    let price = 8.0 + ((seed * 37) % 160) as f64 * 0.5;

    // 40-60% of price, rounded to cents
    let cost_pct = 40.0 + (seed % 21) as f64;
    let cost = (price * cost_pct).round() / 100.0;

    ProductDraft {
        name,
        category: Some(craft.to_string()),
        artisan_id: Some(artisan_id),
        cost,
        price,
        stock: ((seed * 13) % 41) as i64,
    }
}
