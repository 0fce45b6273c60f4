//! # Seed Data Generator
//!
//! Populates the database with a starter medicine inventory for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./medizap_dev.db
//! cargo run -p medizap-db --bin seed
//!
//! # Specify database path
//! cargo run -p medizap-db --bin seed -- --db ./data/medizap.db
//! ```
//!
//! The seeder does nothing if the database already holds medicines.

use std::env;

use medizap_core::{Money, NewMedicine};
use medizap_db::{Database, DbConfig};

/// (category, name, price in paise, stock)
const MEDICINES: &[(&str, &str, i64, i64)] = &[
    ("Analgesic", "Paracetamol 500mg", 1000, 120),
    ("Analgesic", "Ibuprofen 400mg", 1850, 80),
    ("Analgesic", "Aspirin 75mg", 650, 200),
    ("Antibiotic", "Amoxicillin 250mg", 8999, 40),
    ("Antibiotic", "Azithromycin 500mg", 11950, 25),
    ("Antibiotic", "Ciprofloxacin 500mg", 7425, 30),
    ("Antihistamine", "Cetirizine 10mg", 275, 150),
    ("Antihistamine", "Loratadine 10mg", 420, 90),
    ("Antacid", "Omeprazole 20mg", 5600, 60),
    ("Antacid", "Pantoprazole 40mg", 9800, 45),
    ("Antacid", "Ranitidine 150mg", 3150, 0),
    ("Supplement", "Vitamin C 500mg", 1599, 300),
    ("Supplement", "Vitamin D3 1000IU", 2499, 110),
    ("Supplement", "Zinc 50mg", 1875, 75),
    ("Antidiabetic", "Metformin 500mg", 3500, 65),
    ("Cardiac", "Atorvastatin 10mg", 10450, 35),
    ("Cardiac", "Amlodipine 5mg", 4825, 50),
    ("Cough & Cold", "Dextromethorphan Syrup", 9500, 20),
    ("Cough & Cold", "Oral Rehydration Salts", 2100, 140),
    ("First Aid", "Povidone-Iodine Solution", 6300, 15),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./medizap_dev.db");

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
                println!("MediZap Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./medizap_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 MediZap Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.medicines().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} medicines", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0;
    for (category, name, price_cents, stock) in MEDICINES {
        let medicine = NewMedicine::new(*name, *category, Money::from_cents(*price_cents), *stock);

        if let Err(e) = db.medicines().insert(&medicine).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Inserted {} medicines", generated);

    let check = db.medicines().find_by_name("Paracetamol 500mg").await?;
    println!(
        "  Search 'Paracetamol 500mg': {}",
        check.map_or_else(|| "not found".to_string(), |m| m.price().to_string())
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
