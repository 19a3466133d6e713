//! # Seed Data Generator
//!
//! Populates the database with sample customers and products for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults
//! cargo run -p storefront-db --bin seed
//!
//! # Generate more products
//! cargo run -p storefront-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/store.db
//! ```
//!
//! ## Generated Data
//! - A handful of customers with valid 11-digit tax ids and phone numbers
//! - Stationery and office products with cent prices and random-ish stock
//! - Books, which carry an author and land in the book listing

use std::env;
use storefront_core::NewProduct;
use storefront_db::{Database, DbConfig};

/// Plain products cycled through while seeding.
const GENERAL_PRODUCTS: &[&str] = &[
    "Spiral Notebook",
    "Ballpoint Pen",
    "Mechanical Pencil",
    "Eraser",
    "Ruler 30cm",
    "Highlighter",
    "Stapler",
    "Sticky Notes",
    "Envelope Pack",
    "Printer Paper A4",
    "Desk Organizer",
    "Whiteboard Marker",
    "Correction Tape",
    "Binder Clip Box",
    "Index Cards",
];

/// Book titles and authors cycled through while seeding.
const BOOKS: &[(&str, &str)] = &[
    ("The Pragmatic Programmer", "Hunt and Thomas"),
    ("Clean Code", "Robert C. Martin"),
    ("Designing Data-Intensive Applications", "Martin Kleppmann"),
    ("The Mythical Man-Month", "Frederick Brooks"),
    ("Structure and Interpretation", "Abelson and Sussman"),
    ("Refactoring", "Martin Fowler"),
    ("Code Complete", "Steve McConnell"),
    ("Domain-Driven Design", "Eric Evans"),
];

/// Customers registered by the seed. Tax ids and phones are 11 digits.
const CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    ("12345678901", "Alice Martin", "11987650001", "1 Main Street"),
    ("23456789012", "Bruno Costa", "11987650002", "22 Harbor Road"),
    ("34567890123", "Carla Dias", "11987650003", "7 Oak Avenue"),
    ("45678901234", "Diego Silva", "11987650004", "140 Hill Lane"),
    ("56789012345", "Elena Rocha", "11987650005", "9 River Court"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 100;
    let mut db_path = String::from("./store_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(100);
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
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 100)");
                println!("  -d, --db <PATH>    Database file path (default: ./store_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Storefront Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database (runs migrations)
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Register customers
    for (tax_id, name, phone, address) in CUSTOMERS {
        db.customers()
            .insert(&storefront_core::Customer {
                tax_id: tax_id.to_string(),
                name: name.to_string(),
                phone: phone.to_string(),
                address: address.to_string(),
            })
            .await?;
    }
    println!("✓ Registered {} customers", CUSTOMERS.len());

    // Generate products
    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0usize;

    while generated < count {
        let new_product = if generated % 4 == 3 {
            // Every fourth product is a book
            let (title, author) = BOOKS[(generated / 4) % BOOKS.len()];
            let batch = generated / (4 * BOOKS.len());
            let name = if batch == 0 {
                title.to_string()
            } else {
                format!("{} (printing {})", title, batch + 1)
            };
            NewProduct::book(name, purchase_cents(generated), sale_cents(generated), stock(generated), author)
        } else {
            let base = GENERAL_PRODUCTS[generated % GENERAL_PRODUCTS.len()];
            let batch = generated / GENERAL_PRODUCTS.len();
            let name = if batch == 0 {
                base.to_string()
            } else {
                format!("{} #{}", base, batch + 1)
            };
            NewProduct::general(name, purchase_cents(generated), sale_cents(generated), stock(generated))
        };

        db.products().insert(&new_product).await?;
        generated += 1;

        if generated % 50 == 0 {
            println!("  {} / {} products", generated, count);
        }
    }

    let elapsed = start.elapsed();
    let total = db.products().count().await?;
    let books = db.products().list_books().await?.len();

    println!();
    println!("✓ Seeded {} products ({} books) in {:.2?}", total, books, elapsed);
    println!();
    println!("Try it:");
    println!("  sale: db.checkout().sell(\"12345678901\", &[1, 2, 2])");

    db.close().await;
    Ok(())
}

/// Deterministic pseudo-variety without pulling in a RNG crate.
fn purchase_cents(i: usize) -> i64 {
    199 + ((i as i64 * 37) % 1800)
}

fn sale_cents(i: usize) -> i64 {
    // Keeps a positive margin over the purchase price.
    purchase_cents(i) + 100 + ((i as i64 * 53) % 900)
}

fn stock(i: usize) -> i64 {
    // A slice of the catalog starts out of stock on purpose.
    if i % 11 == 0 {
        0
    } else {
        (i as i64 * 13) % 60 + 1
    }
}
