//! # SQLite Store
//!
//! [`Store`] implementation backed by a sqlx SQLite pool.
//!
//! ## Transaction Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  store.begin()  ──►  BEGIN IMMEDIATE  ──►  Transaction<'static, Sqlite> │
//! │                                               │ (owns its connection)   │
//! │                                               ▼                         │
//! │                      SqliteTx ── MedicineStore / CartStore methods      │
//! │                                               │                         │
//! │                   ┌───────────────────────────┴──────────┐              │
//! │                   ▼                                      ▼              │
//! │            tx.commit()  → COMMIT            drop(tx) → ROLLBACK         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write Lock
//! Transactions open with `BEGIN IMMEDIATE` and hold SQLite's write lock
//! from the start. A deferred `BEGIN` that reads and then writes can hit
//! "database is locked" at once when another connection upgrades first;
//! an immediate one waits up to the busy timeout instead.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::DbError;
use crate::repository::{cart, medicine};
use medizap_core::{
    CartEntry, CartEntryId, CartLine, CartStore, CoreError, CoreResult, Medicine, MedicineId,
    MedicineStore, NewCartEntry, NewMedicine, Store, StoreTx,
};

const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// SQLite-backed [`Store`].
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store over an existing (migrated) pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }
}

#[async_trait]
impl Store for SqliteStore {
    type Tx = SqliteTx;

    async fn begin(&self) -> CoreResult<SqliteTx> {
        let tx = self
            .pool
            .begin_with(BEGIN_WRITE)
            .await
            .map_err(DbError::from)?;
        Ok(SqliteTx { tx })
    }
}

/// An open SQLite transaction.
pub struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl StoreTx for SqliteTx {
    async fn commit(self) -> CoreResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MedicineStore for SqliteTx {
    async fn get_medicine(&mut self, id: MedicineId) -> CoreResult<Option<Medicine>> {
        Ok(medicine::get(&mut *self.tx, id).await?)
    }

    async fn find_medicine_by_name(&mut self, name: &str) -> CoreResult<Option<Medicine>> {
        Ok(medicine::find_by_name(&mut *self.tx, name).await?)
    }

    async fn list_medicines(&mut self) -> CoreResult<Vec<Medicine>> {
        Ok(medicine::list(&mut *self.tx).await?)
    }

    async fn insert_medicine(&mut self, new_medicine: &NewMedicine) -> CoreResult<Medicine> {
        Ok(medicine::insert(&mut *self.tx, new_medicine).await?)
    }

    async fn save_medicine(&mut self, updated: &Medicine) -> CoreResult<Medicine> {
        medicine::update(&mut *self.tx, updated)
            .await?
            .ok_or(CoreError::MedicineNotFound(updated.id))
    }

    async fn delete_medicine(&mut self, id: MedicineId) -> CoreResult<bool> {
        Ok(medicine::delete(&mut *self.tx, id).await?)
    }
}

#[async_trait]
impl CartStore for SqliteTx {
    async fn get_entry(&mut self, id: CartEntryId) -> CoreResult<Option<CartEntry>> {
        Ok(cart::get(&mut *self.tx, id).await?)
    }

    async fn find_entry_by_medicine(
        &mut self,
        medicine_id: MedicineId,
    ) -> CoreResult<Option<CartEntry>> {
        Ok(cart::find_by_medicine(&mut *self.tx, medicine_id).await?)
    }

    async fn list_entries(&mut self) -> CoreResult<Vec<CartEntry>> {
        Ok(cart::list(&mut *self.tx).await?)
    }

    async fn list_lines(&mut self) -> CoreResult<Vec<CartLine>> {
        Ok(cart::list_lines(&mut *self.tx).await?)
    }

    async fn insert_entry(&mut self, entry: &NewCartEntry) -> CoreResult<CartEntry> {
        Ok(cart::insert(&mut *self.tx, entry).await?)
    }

    async fn save_entry(&mut self, entry: &CartEntry) -> CoreResult<CartEntry> {
        cart::update(&mut *self.tx, entry)
            .await?
            .ok_or(CoreError::CartEntryNotFound(entry.id))
    }

    async fn delete_entry(&mut self, id: CartEntryId) -> CoreResult<bool> {
        Ok(cart::delete(&mut *self.tx, id).await?)
    }

    async fn delete_entries_for_medicine(&mut self, medicine_id: MedicineId) -> CoreResult<u64> {
        Ok(cart::delete_for_medicine(&mut *self.tx, medicine_id).await?)
    }

    async fn delete_all_entries(&mut self) -> CoreResult<u64> {
        Ok(cart::delete_all(&mut *self.tx).await?)
    }
}
