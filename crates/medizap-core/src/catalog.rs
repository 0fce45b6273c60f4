//! # Medicine Catalog
//!
//! Inventory operations: listing, exact-name search, creation, deletion and
//! stock/price updates.
//!
//! ## Deleting a medicine that is in the cart
//! ```text
//! delete_by_id(7)
//!      │
//!      ▼
//! ┌───────────────────── one transaction ─────────────────────┐
//! │  get_medicine(7)          → None? return None (no error)   │
//! │  delete_entries_for_medicine(7)   ← cart lines go with it  │
//! │  delete_medicine(7)                                        │
//! └────────────────────────────────────────────────────────────┘
//!      │
//!      ▼
//! Some(prior record)
//! ```
//! The cart never holds a dangling medicine reference.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{CartStore, MedicineStore, Store, StoreTx};
use crate::types::{Medicine, MedicineId, NewMedicine};
use crate::validation::validate_price_cents;

/// Medicine inventory service.
///
/// ## Usage
/// ```rust,ignore
/// use medizap_core::{InMemoryStore, MedicineCatalog, Money, NewMedicine};
///
/// let catalog = MedicineCatalog::new(InMemoryStore::new());
/// let med = catalog
///     .add(NewMedicine::new("Paracetamol", "Analgesic", Money::from_cents(1000), 50))
///     .await?;
///
/// let found = catalog.search("Paracetamol").await?;
/// assert_eq!(found.map(|m| m.id), Some(med.id));
/// ```
#[derive(Debug)]
pub struct MedicineCatalog<S: Store> {
    store: Arc<S>,
}

impl<S: Store> Clone for MedicineCatalog<S> {
    fn clone(&self) -> Self {
        MedicineCatalog {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> MedicineCatalog<S> {
    /// Creates a catalog that owns `store`.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Creates a catalog over a store shared with other services.
    pub fn from_shared(store: Arc<S>) -> Self {
        MedicineCatalog { store }
    }

    /// Lists every medicine.
    pub async fn list_all(&self) -> CoreResult<Vec<Medicine>> {
        let mut tx = self.store.begin().await?;
        let medicines = tx.list_medicines().await?;
        debug!(count = medicines.len(), "Listed medicines");
        Ok(medicines)
    }

    /// Looks up a medicine by id.
    pub async fn get(&self, id: MedicineId) -> CoreResult<Option<Medicine>> {
        let mut tx = self.store.begin().await?;
        tx.get_medicine(id).await
    }

    /// Finds the medicine named exactly `name` (case-sensitive).
    ///
    /// ## Returns
    /// * `Ok(Some(Medicine))` - Exact match
    /// * `Ok(None)` - No medicine has that name
    pub async fn search(&self, name: &str) -> CoreResult<Option<Medicine>> {
        debug!(name = %name, "Searching medicine");
        let mut tx = self.store.begin().await?;
        tx.find_medicine_by_name(name).await
    }

    /// Adds a medicine and returns the stored record with its new id.
    pub async fn add(&self, medicine: NewMedicine) -> CoreResult<Medicine> {
        validate_price_cents(medicine.price_cents)?;

        let mut tx = self.store.begin().await?;
        let stored = tx.insert_medicine(&medicine).await?;
        tx.commit().await?;

        info!(id = %stored.id, name = %stored.name, "Medicine added");
        Ok(stored)
    }

    /// Deletes a medicine, cascading to any cart entry that references it.
    ///
    /// ## Returns
    /// * `Ok(Some(Medicine))` - The record as it was before deletion
    /// * `Ok(None)` - No medicine with that id (nothing changed)
    pub async fn delete_by_id(&self, id: MedicineId) -> CoreResult<Option<Medicine>> {
        let mut tx = self.store.begin().await?;

        let Some(existing) = tx.get_medicine(id).await? else {
            debug!(id = %id, "Delete requested for unknown medicine");
            return Ok(None);
        };

        let removed_entries = tx.delete_entries_for_medicine(id).await?;
        tx.delete_medicine(id).await?;
        tx.commit().await?;

        info!(id = %id, removed_entries, "Medicine deleted");
        Ok(Some(existing))
    }

    /// Overwrites the stock of a medicine.
    ///
    /// No floor or ceiling is applied; the value is stored as given.
    pub async fn update_stock(&self, id: MedicineId, new_stock: i64) -> CoreResult<Medicine> {
        debug!(id = %id, new_stock, "Updating stock");

        let mut tx = self.store.begin().await?;
        let mut medicine = tx
            .get_medicine(id)
            .await?
            .ok_or(CoreError::MedicineNotFound(id))?;

        medicine.stock = new_stock;
        let updated = tx.save_medicine(&medicine).await?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Changes the unit price of a medicine.
    ///
    /// Cart entries keep their current totals; the new price applies the
    /// next time an entry for this medicine is merged or re-quantified.
    pub async fn update_price(&self, id: MedicineId, price: Money) -> CoreResult<Medicine> {
        validate_price_cents(price.cents())?;
        debug!(id = %id, price = %price, "Updating price");

        let mut tx = self.store.begin().await?;
        let mut medicine = tx
            .get_medicine(id)
            .await?
            .ok_or(CoreError::MedicineNotFound(id))?;

        medicine.price_cents = price.cents();
        let updated = tx.save_medicine(&medicine).await?;
        tx.commit().await?;

        Ok(updated)
    }
}
