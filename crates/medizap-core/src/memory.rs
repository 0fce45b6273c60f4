//! # In-Memory Store
//!
//! A [`Store`] kept entirely in process memory.
//!
//! ## Transactions
//! `begin()` takes the store lock and works on a copy of the data.
//! `commit()` swaps the copy in; dropping the transaction throws it away.
//! Transactions are therefore fully serialised, which is more than the
//! services need but keeps the fake simple and honest.
//!
//! The same constraints as the SQLite schema are enforced: one entry per
//! medicine, entries must reference an existing medicine, quantity > 0 and
//! price >= 0.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{CoreError, CoreResult};
use crate::store::{CartStore, MedicineStore, Store, StoreTx};
use crate::types::{
    CartEntry, CartEntryId, CartLine, Medicine, MedicineId, NewCartEntry, NewMedicine,
};

#[derive(Debug, Clone, Default)]
struct State {
    medicines: BTreeMap<MedicineId, Medicine>,
    entries: BTreeMap<CartEntryId, CartEntry>,
    last_medicine_id: i64,
    last_entry_id: i64,
}

/// In-memory implementation of [`Store`].
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> CoreResult<InMemoryTx> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryTx { guard, working })
    }
}

/// Transaction over an [`InMemoryStore`].
#[derive(Debug)]
pub struct InMemoryTx {
    guard: OwnedMutexGuard<State>,
    working: State,
}

fn constraint(message: &str) -> CoreError {
    CoreError::Storage(message.to_string())
}

#[async_trait]
impl StoreTx for InMemoryTx {
    async fn commit(mut self) -> CoreResult<()> {
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}

#[async_trait]
impl MedicineStore for InMemoryTx {
    async fn get_medicine(&mut self, id: MedicineId) -> CoreResult<Option<Medicine>> {
        Ok(self.working.medicines.get(&id).cloned())
    }

    async fn find_medicine_by_name(&mut self, name: &str) -> CoreResult<Option<Medicine>> {
        Ok(self
            .working
            .medicines
            .values()
            .find(|m| m.name == name)
            .cloned())
    }

    async fn list_medicines(&mut self) -> CoreResult<Vec<Medicine>> {
        Ok(self.working.medicines.values().cloned().collect())
    }

    async fn insert_medicine(&mut self, medicine: &NewMedicine) -> CoreResult<Medicine> {
        if medicine.price_cents < 0 {
            return Err(constraint("CHECK constraint failed: price_cents >= 0"));
        }

        self.working.last_medicine_id += 1;
        let now = Utc::now();
        let stored = Medicine {
            id: MedicineId::new(self.working.last_medicine_id),
            name: medicine.name.clone(),
            category: medicine.category.clone(),
            price_cents: medicine.price_cents,
            stock: medicine.stock,
            created_at: now,
            updated_at: now,
        };
        self.working.medicines.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save_medicine(&mut self, medicine: &Medicine) -> CoreResult<Medicine> {
        if medicine.price_cents < 0 {
            return Err(constraint("CHECK constraint failed: price_cents >= 0"));
        }

        let slot = self
            .working
            .medicines
            .get_mut(&medicine.id)
            .ok_or(CoreError::MedicineNotFound(medicine.id))?;

        *slot = Medicine {
            created_at: slot.created_at,
            updated_at: Utc::now(),
            ..medicine.clone()
        };
        Ok(slot.clone())
    }

    async fn delete_medicine(&mut self, id: MedicineId) -> CoreResult<bool> {
        if self.working.entries.values().any(|e| e.medicine_id == id) {
            return Err(constraint("FOREIGN KEY constraint failed"));
        }
        Ok(self.working.medicines.remove(&id).is_some())
    }
}

#[async_trait]
impl CartStore for InMemoryTx {
    async fn get_entry(&mut self, id: CartEntryId) -> CoreResult<Option<CartEntry>> {
        Ok(self.working.entries.get(&id).cloned())
    }

    async fn find_entry_by_medicine(
        &mut self,
        medicine_id: MedicineId,
    ) -> CoreResult<Option<CartEntry>> {
        Ok(self
            .working
            .entries
            .values()
            .find(|e| e.medicine_id == medicine_id)
            .cloned())
    }

    async fn list_entries(&mut self) -> CoreResult<Vec<CartEntry>> {
        Ok(self.working.entries.values().cloned().collect())
    }

    async fn list_lines(&mut self) -> CoreResult<Vec<CartLine>> {
        let medicines = &self.working.medicines;
        Ok(self
            .working
            .entries
            .values()
            .filter_map(|e| medicines.get(&e.medicine_id).map(|m| CartLine::new(e, &m.name)))
            .collect())
    }

    async fn insert_entry(&mut self, entry: &NewCartEntry) -> CoreResult<CartEntry> {
        if entry.quantity <= 0 {
            return Err(constraint("CHECK constraint failed: quantity > 0"));
        }
        if !self.working.medicines.contains_key(&entry.medicine_id) {
            return Err(constraint("FOREIGN KEY constraint failed"));
        }
        if self
            .working
            .entries
            .values()
            .any(|e| e.medicine_id == entry.medicine_id)
        {
            return Err(constraint(
                "UNIQUE constraint failed: cart_entries.medicine_id",
            ));
        }

        self.working.last_entry_id += 1;
        let now = Utc::now();
        let stored = CartEntry {
            id: CartEntryId::new(self.working.last_entry_id),
            medicine_id: entry.medicine_id,
            quantity: entry.quantity,
            total_price_cents: entry.total_price_cents,
            created_at: now,
            updated_at: now,
        };
        self.working.entries.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save_entry(&mut self, entry: &CartEntry) -> CoreResult<CartEntry> {
        if entry.quantity <= 0 {
            return Err(constraint("CHECK constraint failed: quantity > 0"));
        }

        let slot = self
            .working
            .entries
            .get_mut(&entry.id)
            .ok_or(CoreError::CartEntryNotFound(entry.id))?;

        slot.quantity = entry.quantity;
        slot.total_price_cents = entry.total_price_cents;
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    async fn delete_entry(&mut self, id: CartEntryId) -> CoreResult<bool> {
        Ok(self.working.entries.remove(&id).is_some())
    }

    async fn delete_entries_for_medicine(&mut self, medicine_id: MedicineId) -> CoreResult<u64> {
        let before = self.working.entries.len();
        self.working.entries.retain(|_, e| e.medicine_id != medicine_id);
        Ok((before - self.working.entries.len()) as u64)
    }

    async fn delete_all_entries(&mut self) -> CoreResult<u64> {
        let removed = self.working.entries.len() as u64;
        self.working.entries.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn paracetamol() -> NewMedicine {
        NewMedicine::new("Paracetamol", "Analgesic", Money::from_cents(1000), 50)
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_order() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let a = tx.insert_medicine(&paracetamol()).await.unwrap();
        let b = tx.insert_medicine(&paracetamol()).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(a.id.get(), 1);
        assert_eq!(b.id.get(), 2);
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let store = InMemoryStore::new();

        {
            let mut tx = store.begin().await.unwrap();
            tx.insert_medicine(&paracetamol()).await.unwrap();
            // dropped without commit
        }

        let mut tx = store.begin().await.unwrap();
        assert!(tx.list_medicines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unique_entry_per_medicine() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let med = tx.insert_medicine(&paracetamol()).await.unwrap();

        let new_entry = NewCartEntry {
            medicine_id: med.id,
            quantity: 1,
            total_price_cents: 1000,
        };
        tx.insert_entry(&new_entry).await.unwrap();

        let err = tx.insert_entry(&new_entry).await.unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_entry_requires_existing_medicine() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();

        let err = tx
            .insert_entry(&NewCartEntry {
                medicine_id: MedicineId::new(99),
                quantity: 1,
                total_price_cents: 100,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
    }

    #[tokio::test]
    async fn test_save_missing_entry_is_not_found() {
        let store = InMemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let now = Utc::now();

        let ghost = CartEntry {
            id: CartEntryId::new(5),
            medicine_id: MedicineId::new(1),
            quantity: 1,
            total_price_cents: 100,
            created_at: now,
            updated_at: now,
        };
        let err = tx.save_entry(&ghost).await.unwrap_err();
        assert!(matches!(err, CoreError::CartEntryNotFound(id) if id.get() == 5));
    }
}
