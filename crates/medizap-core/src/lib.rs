//! # medizap-core: Inventory and Cart Logic for MediZap
//!
//! This crate holds the business rules of the MediZap pharmacy storefront:
//! the medicine catalog and the cart that aggregates purchases of it.
//! Persistence is reached only through the [`store`] traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MediZap Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    medizap CLI (apps/medizap-cli)                │   │
//! │  │    medicines list/search/add ... ──  cart add/update/clear ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ medizap-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │   cart    │  │   money   │  │ validation│  │   │
//! │  │   │ Medicine  │  │ merge-or- │  │   Money   │  │   rules   │  │   │
//! │  │   │ Catalog   │  │  create   │  │  (cents)  │  │           │  │   │
//! │  │   └─────┬─────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │         └──────┬───────┘                                        │   │
//! │  │                ▼                                                │   │
//! │  │   store::Store ──► InMemoryStore (tests)                        │   │
//! │  └────────────────┬────────────────────────────────────────────────┘   │
//! │                   │                                                     │
//! │  ┌────────────────▼────────────────────────────────────────────────┐   │
//! │  │                  medizap-db (Database Layer)                    │   │
//! │  │          SqliteStore, migrations, repositories                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Medicine, CartEntry, CartLine, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Argument rules (quantity, price)
//! - [`store`] - Storage traits
//! - [`memory`] - In-memory store
//! - [`catalog`] - Medicine inventory service
//! - [`cart`] - Cart aggregation service
//!
//! ## Example Usage
//!
//! ```rust
//! use medizap_core::Money;
//!
//! let price = Money::from_cents(1000);
//! let total = price.checked_multiply_quantity(3).unwrap();
//!
//! assert_eq!(total.cents(), 3000);
//! assert_eq!(total.to_string(), "₹30.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod memory;
pub mod money;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartAggregator;
pub use catalog::MedicineCatalog;
pub use error::{CoreError, CoreResult, ValidationError};
pub use memory::InMemoryStore;
pub use money::Money;
pub use store::{CartStore, MedicineStore, Store, StoreTx};
pub use types::*;
