//! # Repository Module
//!
//! SQL for MediZap, one module per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  MedicineCatalog / CartAggregator (medizap-core)                       │
//! │       │                                                                 │
//! │       │  tx.get_medicine(id)                                            │
//! │       ▼                                                                 │
//! │  SqliteTx (store.rs)                                                   │
//! │       │                                                                 │
//! │       │  medicine::get(&mut tx, id)                                     │
//! │       ▼                                                                 │
//! │  medicine.rs / cart.rs                                                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`MedicineRepository`](medicine::MedicineRepository) - Medicine reads and inserts
//! - [`CartRepository`](cart::CartRepository) - Cart reads

pub mod cart;
pub mod medicine;
