//! # Seed Data Loader
//!
//! Creates (or migrates) a rental database and loads the demo accounts and
//! cars.
//!
//! ## Usage
//! ```bash
//! cargo run -p rental-db --bin seed
//! cargo run -p rental-db --bin seed -- --db ./data/car_rental.db
//! ```
//!
//! Skips loading when the database already has users.

use std::env;

use rental_db::demo::seed_demo;
use rental_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rental=debug,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./car_rental.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Car Rental Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./car_rental.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Car Rental Seed Data Loader");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !seed_demo(&db).await? {
        println!("⚠ Database already has users");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!("✓ Loaded {} users", db.users().count().await?);
    println!("✓ Loaded {} cars", db.cars().count().await?);

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}

