//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐   cart add    ┌──────────┐   cart clear   ┌──────────┐   │
//! │  │  Empty   │──────────────►│ In Cart  │───────────────►│  Empty   │   │
//! │  │  Cart    │               │          │                │  Cart    │   │
//! │  └──────────┘               └──────────┘                └──────────┘   │
//! │                               │      ▲                                  │
//! │                               │      │ cart add (same medicine merges) │
//! │                               │      │ cart update <entry> <qty>       │
//! │                               ▼      │                                  │
//! │                          cart remove <entry>  → { "removed": bool }    │
//! │                          cart delete <entry>  → removed entry | null   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use super::{CommandResult, Services};
use medizap_core::{CartEntryId, CartLine, CartSummary, CoreError, MedicineId, Money, Store};

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Add a medicine to the cart (merges with an existing entry)
    Add {
        medicine_id: i64,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Show cart lines and totals
    List,

    /// Set the quantity of a cart entry
    Update {
        entry_id: i64,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a cart entry, reporting whether it existed
    Remove {
        entry_id: i64,
    },

    /// Remove a cart entry and print it
    Delete {
        entry_id: i64,
    },

    /// Empty the cart
    Clear,
}

/// Cart view: lines plus totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub summary: CartSummary,
    /// Grand total formatted for display, e.g. "₹50.00"
    pub total: String,
}

impl CartResponse {
    fn new(items: Vec<CartLine>, summary: CartSummary) -> Self {
        CartResponse {
            items,
            summary,
            total: Money::from_cents(summary.total_cents).to_string(),
        }
    }
}

/// Runs a `cart` subcommand.
pub async fn run<S: Store>(command: CartCommand, services: &Services<S>) -> CommandResult {
    debug!(?command, "cart command");
    let cart = &services.cart;

    let output = match command {
        CartCommand::Add {
            medicine_id,
            quantity,
        } => serde_json::to_value(cart.add_to_cart(MedicineId::new(medicine_id), quantity).await?)?,

        CartCommand::List => {
            // Totals come from the same snapshot as the lines
            let items = cart.lines().await?;
            let summary = CartSummary::try_from(items.as_slice()).map_err(CoreError::from)?;
            serde_json::to_value(CartResponse::new(items, summary))?
        }

        CartCommand::Update { entry_id, quantity } => serde_json::to_value(
            cart.update_quantity(CartEntryId::new(entry_id), quantity)
                .await?,
        )?,

        CartCommand::Remove { entry_id } => {
            let removed = cart.remove_by_id(CartEntryId::new(entry_id)).await?;
            json!({ "removed": removed })
        }

        CartCommand::Delete { entry_id } => {
            serde_json::to_value(cart.remove_and_return(CartEntryId::new(entry_id)).await?)?
        }

        CartCommand::Clear => {
            let removed = cart.clear_all().await?;
            json!({ "removed": removed })
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use medizap_core::{InMemoryStore, NewMedicine};

    async fn services_with_medicine() -> Services<InMemoryStore> {
        let services = Services::new(InMemoryStore::new());
        services
            .catalog
            .add(NewMedicine::new(
                "Paracetamol",
                "Analgesic",
                Money::from_cents(1000),
                50,
            ))
            .await
            .unwrap();
        services
    }

    #[tokio::test]
    async fn test_add_merge_and_list() {
        let services = services_with_medicine().await;

        let first = run(CartCommand::Add { medicine_id: 1, quantity: 3 }, &services)
            .await
            .unwrap();
        assert_eq!(first["totalPriceCents"], 3000);

        let merged = run(CartCommand::Add { medicine_id: 1, quantity: 2 }, &services)
            .await
            .unwrap();
        assert_eq!(merged["id"], first["id"]);
        assert_eq!(merged["quantity"], 5);

        let view = run(CartCommand::List, &services).await.unwrap();
        assert_eq!(view["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(view["items"][0]["medicineName"], "Paracetamol");
        assert_eq!(view["summary"]["totalCents"], 5000);
        assert_eq!(view["total"], "₹50.00");
    }

    #[tokio::test]
    async fn test_invalid_quantity_maps_to_validation_error() {
        let services = services_with_medicine().await;

        for quantity in [0, -1] {
            let err = run(CartCommand::Add { medicine_id: 1, quantity }, &services)
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError);
        }
    }

    #[tokio::test]
    async fn test_unknown_medicine_maps_to_not_found() {
        let services = services_with_medicine().await;

        let err = run(CartCommand::Add { medicine_id: 42, quantity: 1 }, &services)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Medicine not found: 42");
    }

    #[tokio::test]
    async fn test_list_with_overflowing_total_is_validation_error() {
        let services = Services::new(InMemoryStore::new());
        let half = i64::MAX / 2 + 1;
        for name in ["Rare A", "Rare B"] {
            services
                .catalog
                .add(NewMedicine::new(name, "Analgesic", Money::from_cents(half), 1))
                .await
                .unwrap();
        }
        run(CartCommand::Add { medicine_id: 1, quantity: 1 }, &services)
            .await
            .unwrap();
        run(CartCommand::Add { medicine_id: 2, quantity: 1 }, &services)
            .await
            .unwrap();

        let err = run(CartCommand::List, &services).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "cart total is too large");
    }

    #[tokio::test]
    async fn test_remove_delete_and_clear_outputs() {
        let services = services_with_medicine().await;
        run(CartCommand::Add { medicine_id: 1, quantity: 1 }, &services)
            .await
            .unwrap();

        let removed = run(CartCommand::Remove { entry_id: 99 }, &services).await.unwrap();
        assert_eq!(removed, json!({ "removed": false }));

        let deleted = run(CartCommand::Delete { entry_id: 1 }, &services).await.unwrap();
        assert_eq!(deleted["medicineId"], 1);

        let deleted = run(CartCommand::Delete { entry_id: 1 }, &services).await.unwrap();
        assert!(deleted.is_null());

        let cleared = run(CartCommand::Clear, &services).await.unwrap();
        assert_eq!(cleared, json!({ "removed": 0 }));
    }
}
