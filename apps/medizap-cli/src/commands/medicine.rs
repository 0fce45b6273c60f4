//! # Medicine Commands
//!
//! Inventory management from the command line.
//!
//! ```text
//! medizap medicines list
//! medizap medicines get 3
//! medizap medicines search "Paracetamol 500mg"
//! medizap medicines add --name Aspirin --category Analgesic --price 6.50 --stock 200
//! medizap medicines delete 3
//! medizap medicines stock 3 75
//! medizap medicines price 3 7.25
//! ```
//!
//! Lookups that find nothing print `null`; they are not errors.

use clap::Subcommand;
use tracing::debug;

use super::{CommandResult, Services};
use medizap_core::{MedicineId, Money, NewMedicine, Store};

#[derive(Debug, Subcommand)]
pub enum MedicineCommand {
    /// List all medicines
    List,

    /// Show one medicine by id
    Get {
        id: i64,
    },

    /// Find the medicine with exactly this name (case-sensitive)
    Search {
        name: String,
    },

    /// Add a medicine to the inventory
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "General")]
        category: String,

        /// Unit price, e.g. 10.99
        #[arg(long, allow_negative_numbers = true)]
        price: Money,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        stock: i64,
    },

    /// Delete a medicine (its cart entries go with it)
    Delete {
        id: i64,
    },

    /// Overwrite the stock of a medicine
    Stock {
        id: i64,

        #[arg(allow_negative_numbers = true)]
        stock: i64,
    },

    /// Change the unit price of a medicine
    Price {
        id: i64,

        /// New unit price, e.g. 12.50
        #[arg(allow_negative_numbers = true)]
        price: Money,
    },
}

/// Runs a `medicines` subcommand.
pub async fn run<S: Store>(command: MedicineCommand, services: &Services<S>) -> CommandResult {
    debug!(?command, "medicines command");
    let catalog = &services.catalog;

    let output = match command {
        MedicineCommand::List => serde_json::to_value(catalog.list_all().await?)?,

        MedicineCommand::Get { id } => serde_json::to_value(catalog.get(MedicineId::new(id)).await?)?,

        MedicineCommand::Search { name } => serde_json::to_value(catalog.search(&name).await?)?,

        MedicineCommand::Add {
            name,
            category,
            price,
            stock,
        } => {
            let medicine = catalog.add(NewMedicine::new(name, category, price, stock)).await?;
            serde_json::to_value(medicine)?
        }

        MedicineCommand::Delete { id } => {
            serde_json::to_value(catalog.delete_by_id(MedicineId::new(id)).await?)?
        }

        MedicineCommand::Stock { id, stock } => {
            serde_json::to_value(catalog.update_stock(MedicineId::new(id), stock).await?)?
        }

        MedicineCommand::Price { id, price } => {
            serde_json::to_value(catalog.update_price(MedicineId::new(id), price).await?)?
        }
    };

    Ok(output)
}
