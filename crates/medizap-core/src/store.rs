//! # Storage Abstraction
//!
//! Traits the catalog and cart services use to reach persistence.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store / StoreTx                                    │
//! │                                                                         │
//! │  MedicineCatalog / CartAggregator                                       │
//! │       │                                                                 │
//! │       │  let mut tx = store.begin().await?;                             │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────┐                                      │
//! │  │ StoreTx                       │                                      │
//! │  │  ├── MedicineStore (get, ...) │ ← reads/writes inside the tx         │
//! │  │  └── CartStore     (get, ...) │                                      │
//! │  └───────────────┬───────────────┘                                      │
//! │                  │                                                      │
//! │        tx.commit().await?   ──► all writes become visible               │
//! │        drop(tx) / error     ──► every write is discarded                │
//! │                                                                         │
//! │  Implementations:                                                       │
//! │  • InMemoryStore (this crate) - tests and ephemeral runs                │
//! │  • SqliteStore   (medizap-db) - sqlx Transaction<'static, Sqlite>       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Methods take `&mut self` because a database transaction runs on one
//! exclusive connection.

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{
    CartEntry, CartEntryId, CartLine, Medicine, MedicineId, NewCartEntry, NewMedicine,
};

/// Medicine persistence operations.
#[async_trait]
pub trait MedicineStore: Send {
    /// Finds a medicine by id.
    async fn get_medicine(&mut self, id: MedicineId) -> CoreResult<Option<Medicine>>;

    /// Finds the medicine whose name equals `name` exactly.
    ///
    /// When several medicines share a name the one with the lowest id wins.
    async fn find_medicine_by_name(&mut self, name: &str) -> CoreResult<Option<Medicine>>;

    /// Lists all medicines ordered by id.
    async fn list_medicines(&mut self) -> CoreResult<Vec<Medicine>>;

    /// Inserts a medicine and returns it with its assigned id.
    async fn insert_medicine(&mut self, medicine: &NewMedicine) -> CoreResult<Medicine>;

    /// Writes back every mutable field of an existing medicine.
    ///
    /// Fails with `MedicineNotFound` if the row is gone.
    async fn save_medicine(&mut self, medicine: &Medicine) -> CoreResult<Medicine>;

    /// Deletes a medicine. Returns whether a row was removed.
    async fn delete_medicine(&mut self, id: MedicineId) -> CoreResult<bool>;
}

/// Cart entry persistence operations.
#[async_trait]
pub trait CartStore: Send {
    /// Finds a cart entry by id.
    async fn get_entry(&mut self, id: CartEntryId) -> CoreResult<Option<CartEntry>>;

    /// Finds the entry referencing `medicine_id`, if any.
    async fn find_entry_by_medicine(
        &mut self,
        medicine_id: MedicineId,
    ) -> CoreResult<Option<CartEntry>>;

    /// Lists all cart entries ordered by id.
    async fn list_entries(&mut self) -> CoreResult<Vec<CartEntry>>;

    /// Lists cart entries joined with their medicine names, ordered by id.
    async fn list_lines(&mut self) -> CoreResult<Vec<CartLine>>;

    /// Inserts an entry and returns it with its assigned id.
    ///
    /// Fails if an entry for the same medicine already exists.
    async fn insert_entry(&mut self, entry: &NewCartEntry) -> CoreResult<CartEntry>;

    /// Writes back quantity and total of an existing entry.
    ///
    /// Fails with `CartEntryNotFound` if the row is gone.
    async fn save_entry(&mut self, entry: &CartEntry) -> CoreResult<CartEntry>;

    /// Deletes an entry. Returns whether a row was removed.
    async fn delete_entry(&mut self, id: CartEntryId) -> CoreResult<bool>;

    /// Deletes every entry referencing `medicine_id`. Returns the count.
    async fn delete_entries_for_medicine(&mut self, medicine_id: MedicineId) -> CoreResult<u64>;

    /// Deletes every entry. Returns the count.
    async fn delete_all_entries(&mut self) -> CoreResult<u64>;
}

/// A unit of work over both entity stores.
///
/// Dropping a `StoreTx` without calling [`StoreTx::commit`] rolls back.
#[async_trait]
pub trait StoreTx: MedicineStore + CartStore + Sized {
    /// Makes every write performed through this transaction durable.
    async fn commit(self) -> CoreResult<()>;
}

/// Entry point to a backing store.
#[async_trait]
pub trait Store: Send + Sync {
    type Tx: StoreTx;

    /// Starts a new transaction.
    async fn begin(&self) -> CoreResult<Self::Tx>;
}
