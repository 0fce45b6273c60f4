//! # medizap-db: Database Layer for MediZap
//!
//! SQLite persistence for the medicine catalog and the cart, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MediZap Data Flow                                │
//! │                                                                         │
//! │  medizap cart add 7 3                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CartAggregator::add_to_cart (medizap-core)                            │
//! │       │  store.begin()                                                  │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    medizap-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  SqliteStore  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (store.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │       │       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  repository/  │    │ 001_initial_ │  │   │
//! │  │   │               │    │  medicine.rs  │    │  schema.sql  │  │   │
//! │  │   │               │    │  cart.rs      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (medizap.db)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQL per table
//! - [`store`] - `Store` implementation used by the services
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medizap_core::{CartAggregator, MedicineCatalog};
//! use medizap_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("medizap.db")).await?;
//! let store = Arc::new(db.store());
//!
//! let catalog = MedicineCatalog::from_shared(Arc::clone(&store));
//! let cart = CartAggregator::from_shared(store);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::{SqliteStore, SqliteTx};

pub use repository::cart::CartRepository;
pub use repository::medicine::MedicineRepository;
