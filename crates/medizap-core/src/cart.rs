//! # Cart Aggregator
//!
//! Business rules for the shopping cart: merge-or-create on add, totals
//! derived from the medicine's current price, and positive quantities only.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_to_cart(med, qty) ──► qty > 0? ──► medicine exists?               │
//! │                                             │                           │
//! │                     ┌───────────────────────┴─────────────┐             │
//! │                     ▼                                     ▼             │
//! │           entry for med exists                    no entry yet          │
//! │           qty' = qty_old + qty                    insert (qty,          │
//! │           total = price × qty'                      price × qty)        │
//! │                                                                         │
//! │  update_quantity(entry, qty) ──► re-read price ──► total = price × qty  │
//! │  remove_by_id(entry)         ──► bool                                   │
//! │  remove_and_return(entry)    ──► Option<CartEntry>                      │
//! │  clear_all()                 ──► idempotent                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The read-modify-write in `add_to_cart` and `update_quantity` runs under a
//! per-medicine async mutex, so two concurrent adds of the same medicine
//! cannot both observe "no entry" and create duplicates. Different
//! medicines proceed in parallel. The SQLite schema backs this up with a
//! UNIQUE index on `cart_entries.medicine_id` for writers outside this
//! process.
//!
//! Every operation runs in a single store transaction. An error, or the
//! future being dropped, before `commit` leaves the cart untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::store::{CartStore, MedicineStore, Store, StoreTx};
use crate::types::{
    CartEntry, CartEntryId, CartLine, CartSummary, Medicine, MedicineId, NewCartEntry,
};
use crate::validation::{merge_quantity, validate_quantity};

// =============================================================================
// Per-medicine locks
// =============================================================================

#[derive(Debug, Default)]
struct MedicineLocks {
    locks: Mutex<HashMap<MedicineId, Arc<AsyncMutex<()>>>>,
}

impl MedicineLocks {
    /// Waits for exclusive access to `id`'s cart entry.
    async fn acquire(&self, id: MedicineId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Drop locks nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id).or_default())
        };
        lock.lock_owned().await
    }
}

/// Computes `price × quantity`, rejecting overflow.
fn line_total(medicine: &Medicine, quantity: i64) -> CoreResult<Money> {
    medicine
        .price()
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| {
            ValidationError::Overflow {
                field: "total price".to_string(),
            }
            .into()
        })
}

// =============================================================================
// Cart Aggregator
// =============================================================================

/// Cart service mediating between cart entries and the medicine catalog.
///
/// ## Invariants
/// - At most one entry per medicine (merge-on-add)
/// - `quantity > 0` for every stored entry
/// - `total_price == medicine.price × quantity` as of the entry's last write
///
/// ## Usage
/// ```rust,ignore
/// let cart = CartAggregator::from_shared(Arc::clone(&store));
///
/// let entry = cart.add_to_cart(medicine.id, 3).await?;   // {3, 30.00}
/// let entry = cart.add_to_cart(medicine.id, 2).await?;   // {5, 50.00}, same id
/// let entry = cart.update_quantity(entry.id, 1).await?;  // {1, 10.00}
/// ```
#[derive(Debug)]
pub struct CartAggregator<S: Store> {
    store: Arc<S>,
    locks: Arc<MedicineLocks>,
}

impl<S: Store> Clone for CartAggregator<S> {
    fn clone(&self) -> Self {
        CartAggregator {
            store: Arc::clone(&self.store),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<S: Store> CartAggregator<S> {
    /// Creates a cart service that owns `store`.
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Creates a cart service over a store shared with other services.
    pub fn from_shared(store: Arc<S>) -> Self {
        CartAggregator {
            store,
            locks: Arc::new(MedicineLocks::default()),
        }
    }

    /// Adds `quantity` of a medicine to the cart.
    ///
    /// ## Behavior
    /// - Medicine already in cart: quantities are summed and the total is
    ///   recomputed from the medicine's current price
    /// - Medicine not in cart: a new entry is created
    ///
    /// ## Errors
    /// - `CoreError::Validation` if `quantity <= 0`
    /// - `CoreError::MedicineNotFound` if the medicine does not exist
    pub async fn add_to_cart(
        &self,
        medicine_id: MedicineId,
        quantity: i64,
    ) -> CoreResult<CartEntry> {
        validate_quantity(quantity)?;
        debug!(medicine_id = %medicine_id, quantity, "add_to_cart");

        let _guard = self.locks.acquire(medicine_id).await;
        let mut tx = self.store.begin().await?;

        let medicine = tx
            .get_medicine(medicine_id)
            .await?
            .ok_or(CoreError::MedicineNotFound(medicine_id))?;

        let entry = match tx.find_entry_by_medicine(medicine_id).await? {
            Some(mut existing) => {
                let new_quantity = merge_quantity(existing.quantity, quantity)?;
                existing.quantity = new_quantity;
                existing.total_price_cents = line_total(&medicine, new_quantity)?.cents();

                debug!(entry_id = %existing.id, new_quantity, "Merging into existing cart entry");
                tx.save_entry(&existing).await?
            }
            None => {
                let new_entry = NewCartEntry {
                    medicine_id,
                    quantity,
                    total_price_cents: line_total(&medicine, quantity)?.cents(),
                };
                tx.insert_entry(&new_entry).await?
            }
        };

        tx.commit().await?;

        info!(
            entry_id = %entry.id,
            medicine_id = %medicine_id,
            quantity = entry.quantity,
            total = %entry.total_price(),
            "Cart entry written"
        );
        Ok(entry)
    }

    /// Lists all cart entries.
    pub async fn list_all(&self) -> CoreResult<Vec<CartEntry>> {
        let mut tx = self.store.begin().await?;
        tx.list_entries().await
    }

    /// Lists cart entries together with their medicine names.
    pub async fn lines(&self) -> CoreResult<Vec<CartLine>> {
        let mut tx = self.store.begin().await?;
        tx.list_lines().await
    }

    /// Returns item count, total quantity and grand total of the cart.
    ///
    /// ## Errors
    /// - `CoreError::Validation` if the quantities or totals summed over all
    ///   entries do not fit in an `i64`
    pub async fn summary(&self) -> CoreResult<CartSummary> {
        let entries = self.list_all().await?;
        Ok(CartSummary::try_from(entries.as_slice())?)
    }

    /// Sets the quantity of a cart entry.
    ///
    /// The total is recomputed from the medicine's price as it is *now*, so
    /// a price change since the entry was created is picked up here.
    ///
    /// ## Errors
    /// - `CoreError::Validation` if `quantity <= 0`
    /// - `CoreError::CartEntryNotFound` if the entry does not exist
    pub async fn update_quantity(
        &self,
        entry_id: CartEntryId,
        quantity: i64,
    ) -> CoreResult<CartEntry> {
        validate_quantity(quantity)?;
        debug!(entry_id = %entry_id, quantity, "update_quantity");

        // Resolve the medicine first so we serialise with add_to_cart
        let medicine_id = {
            let mut tx = self.store.begin().await?;
            tx.get_entry(entry_id)
                .await?
                .ok_or(CoreError::CartEntryNotFound(entry_id))?
                .medicine_id
        };

        let _guard = self.locks.acquire(medicine_id).await;
        let mut tx = self.store.begin().await?;

        // Re-read under the lock: the entry may have been removed meanwhile
        let mut entry = tx
            .get_entry(entry_id)
            .await?
            .ok_or(CoreError::CartEntryNotFound(entry_id))?;

        let medicine = tx
            .get_medicine(entry.medicine_id)
            .await?
            .ok_or(CoreError::MedicineNotFound(entry.medicine_id))?;

        entry.quantity = quantity;
        entry.total_price_cents = line_total(&medicine, quantity)?.cents();

        let updated = tx.save_entry(&entry).await?;
        tx.commit().await?;

        Ok(updated)
    }

    /// Removes a cart entry.
    ///
    /// ## Returns
    /// * `true` - The entry existed and was removed
    /// * `false` - No such entry (nothing changed)
    pub async fn remove_by_id(&self, entry_id: CartEntryId) -> CoreResult<bool> {
        let mut tx = self.store.begin().await?;
        let removed = tx.delete_entry(entry_id).await?;
        tx.commit().await?;

        debug!(entry_id = %entry_id, removed, "remove_by_id");
        Ok(removed)
    }

    /// Removes a cart entry and hands back what was removed.
    ///
    /// ## Returns
    /// * `Some(CartEntry)` - The entry as it was before removal
    /// * `None` - No such entry (nothing changed)
    pub async fn remove_and_return(&self, entry_id: CartEntryId) -> CoreResult<Option<CartEntry>> {
        let mut tx = self.store.begin().await?;

        let Some(entry) = tx.get_entry(entry_id).await? else {
            return Ok(None);
        };

        tx.delete_entry(entry_id).await?;
        tx.commit().await?;

        debug!(entry_id = %entry_id, "remove_and_return");
        Ok(Some(entry))
    }

    /// Empties the cart. Returns how many entries were removed.
    pub async fn clear_all(&self) -> CoreResult<u64> {
        let mut tx = self.store.begin().await?;
        let removed = tx.delete_all_entries().await?;
        tx.commit().await?;

        info!(removed, "Cart cleared");
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MedicineCatalog;
    use crate::memory::InMemoryStore;
    use crate::types::NewMedicine;

    struct Fixture {
        catalog: MedicineCatalog<InMemoryStore>,
        cart: CartAggregator<InMemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        Fixture {
            catalog: MedicineCatalog::from_shared(Arc::clone(&store)),
            cart: CartAggregator::from_shared(store),
        }
    }

    async fn add_medicine(fx: &Fixture, name: &str, price_cents: i64) -> Medicine {
        fx.catalog
            .add(NewMedicine::new(name, "General", Money::from_cents(price_cents), 50))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_merge_update_scenario() {
        let fx = fixture();
        let med = add_medicine(&fx, "Paracetamol", 1000).await;

        let first = fx.cart.add_to_cart(med.id, 3).await.unwrap();
        assert_eq!(first.quantity, 3);
        assert_eq!(first.total_price_cents, 3000);

        let merged = fx.cart.add_to_cart(med.id, 2).await.unwrap();
        assert_eq!(merged.id, first.id);
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.total_price_cents, 5000);

        let updated = fx.cart.update_quantity(merged.id, 1).await.unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.quantity, 1);
        assert_eq!(updated.total_price_cents, 1000);

        assert_eq!(fx.cart.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_adds_sum_into_one_entry() {
        let fx = fixture();
        let med = add_medicine(&fx, "Cetirizine", 275).await;

        for (q1, q2) in [(1, 1), (2, 7), (10, 3)] {
            fx.cart.clear_all().await.unwrap();
            fx.cart.add_to_cart(med.id, q1).await.unwrap();
            let entry = fx.cart.add_to_cart(med.id, q2).await.unwrap();

            assert_eq!(entry.quantity, q1 + q2);
            assert_eq!(entry.total_price_cents, 275 * (q1 + q2));
            assert_eq!(fx.cart.list_all().await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_non_positive_quantity_is_rejected_without_side_effects() {
        let fx = fixture();
        let med = add_medicine(&fx, "Aspirin", 500).await;
        let entry = fx.cart.add_to_cart(med.id, 2).await.unwrap();

        for bad in [0, -1] {
            let err = fx.cart.add_to_cart(med.id, bad).await.unwrap_err();
            assert!(err.is_invalid_argument());

            let err = fx.cart.update_quantity(entry.id, bad).await.unwrap_err();
            assert!(err.is_invalid_argument());
        }

        let entries = fx.cart.list_all().await.unwrap();
        assert_eq!(entries, vec![entry]);
    }

    #[tokio::test]
    async fn test_add_unknown_medicine() {
        let fx = fixture();

        let err = fx
            .cart
            .add_to_cart(MedicineId::new(999), 5)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::MedicineNotFound(id) if id.get() == 999));
        assert!(fx.cart.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_entry() {
        let fx = fixture();

        let err = fx
            .cart
            .update_quantity(CartEntryId::new(12), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::CartEntryNotFound(id) if id.get() == 12));
    }

    #[tokio::test]
    async fn test_price_change_applies_on_next_update_only() {
        let fx = fixture();
        let med = add_medicine(&fx, "Amoxicillin", 1000).await;
        let entry = fx.cart.add_to_cart(med.id, 2).await.unwrap();

        fx.catalog
            .update_price(med.id, Money::from_cents(1500))
            .await
            .unwrap();

        // Not repriced retroactively
        let listed = fx.cart.list_all().await.unwrap();
        assert_eq!(listed[0].total_price_cents, 2000);

        // Re-read on the next quantity update
        let updated = fx.cart.update_quantity(entry.id, 2).await.unwrap();
        assert_eq!(updated.total_price_cents, 3000);
    }

    #[tokio::test]
    async fn test_merge_uses_current_price() {
        let fx = fixture();
        let med = add_medicine(&fx, "Amoxicillin", 1000).await;
        fx.cart.add_to_cart(med.id, 2).await.unwrap();

        fx.catalog
            .update_price(med.id, Money::from_cents(1200))
            .await
            .unwrap();

        let merged = fx.cart.add_to_cart(med.id, 1).await.unwrap();
        assert_eq!(merged.quantity, 3);
        assert_eq!(merged.total_price_cents, 3600);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let fx = fixture();
        let a = add_medicine(&fx, "Aspirin", 500).await;
        let b = add_medicine(&fx, "Ibuprofen", 800).await;
        let ea = fx.cart.add_to_cart(a.id, 1).await.unwrap();
        let eb = fx.cart.add_to_cart(b.id, 1).await.unwrap();

        assert!(!fx.cart.remove_by_id(CartEntryId::new(999)).await.unwrap());
        assert_eq!(fx.cart.list_all().await.unwrap().len(), 2);

        assert!(fx.cart.remove_by_id(ea.id).await.unwrap());
        assert_eq!(fx.cart.list_all().await.unwrap(), vec![eb]);
    }

    #[tokio::test]
    async fn test_remove_and_return() {
        let fx = fixture();
        let med = add_medicine(&fx, "Aspirin", 500).await;
        let entry = fx.cart.add_to_cart(med.id, 4).await.unwrap();

        assert_eq!(
            fx.cart.remove_and_return(CartEntryId::new(999)).await.unwrap(),
            None
        );

        let removed = fx.cart.remove_and_return(entry.id).await.unwrap();
        assert_eq!(removed, Some(entry.clone()));
        assert!(fx.cart.list_all().await.unwrap().is_empty());
        assert_eq!(fx.cart.remove_and_return(entry.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_all_is_idempotent() {
        let fx = fixture();
        let a = add_medicine(&fx, "Aspirin", 500).await;
        let b = add_medicine(&fx, "Ibuprofen", 800).await;
        fx.cart.add_to_cart(a.id, 1).await.unwrap();
        fx.cart.add_to_cart(b.id, 3).await.unwrap();

        assert_eq!(fx.cart.clear_all().await.unwrap(), 2);
        assert!(fx.cart.list_all().await.unwrap().is_empty());

        assert_eq!(fx.cart.clear_all().await.unwrap(), 0);
        assert!(fx.cart.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lines_and_summary() {
        let fx = fixture();
        let a = add_medicine(&fx, "Aspirin", 500).await;
        let b = add_medicine(&fx, "Ibuprofen", 800).await;
        fx.cart.add_to_cart(a.id, 2).await.unwrap();
        fx.cart.add_to_cart(b.id, 1).await.unwrap();

        let lines = fx.cart.lines().await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].medicine_name, "Aspirin");
        assert_eq!(lines[0].total_price_cents, 1000);
        assert_eq!(lines[1].medicine_name, "Ibuprofen");

        let summary = fx.cart.summary().await.unwrap();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_quantity, 3);
        assert_eq!(summary.total_cents, 1800);
    }

    #[tokio::test]
    async fn test_summary_overflow_is_an_error() {
        let half = i64::MAX / 2 + 1;

        // Two free medicines with huge quantities
        let fx = fixture();
        let a = add_medicine(&fx, "Sample A", 0).await;
        let b = add_medicine(&fx, "Sample B", 0).await;
        fx.cart.add_to_cart(a.id, half).await.unwrap();
        fx.cart.add_to_cart(b.id, half).await.unwrap();

        let err = fx.cart.summary().await.unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Validation error: cart quantity is too large");

        // Two very expensive medicines, one each
        let fx = fixture();
        let a = add_medicine(&fx, "Rare A", half).await;
        let b = add_medicine(&fx, "Rare B", half).await;
        fx.cart.add_to_cart(a.id, 1).await.unwrap();
        fx.cart.add_to_cart(b.id, 1).await.unwrap();

        let err = fx.cart.summary().await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: cart total is too large");
    }

    #[tokio::test]
    async fn test_line_total_overflow_is_rejected() {
        let fx = fixture();
        let med = add_medicine(&fx, "Rare", i64::MAX / 2).await;

        let err = fx.cart.add_to_cart(med.id, 3).await.unwrap_err();
        assert_eq!(err.to_string(), "Validation error: total price is too large");
        assert!(fx.cart.list_all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_produce_single_entry() {
        let fx = fixture();
        let med = add_medicine(&fx, "Paracetamol", 1000).await;

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cart = fx.cart.clone();
            handles.push(tokio::spawn(async move {
                cart.add_to_cart(med.id, 1).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let entries = fx.cart.list_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 16);
        assert_eq!(entries[0].total_price_cents, 16_000);
    }
}
