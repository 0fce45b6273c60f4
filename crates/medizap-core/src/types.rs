//! # Domain Types
//!
//! Core domain types used throughout MediZap.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐            ┌─────────────────────┐                │
//! │  │    Medicine     │◄───────────│     CartEntry       │                │
//! │  │  ─────────────  │  medicine_id (non-owning FK)      │                │
//! │  │  id (i64)       │            │  id (i64)           │                │
//! │  │  name           │            │  quantity (> 0)     │                │
//! │  │  category       │            │  total_price_cents  │                │
//! │  │  price_cents    │            └─────────────────────┘                │
//! │  │  stock          │                                                    │
//! │  └─────────────────┘   CartLine / CartSummary are read models built    │
//! │                        from entries (and medicine names) on demand.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Ids are integers assigned by the store on insert. They are wrapped in
//! newtypes so a cart entry id can never be passed where a medicine id is
//! expected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Store-assigned identity of a [`Medicine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct MedicineId(i64);

impl MedicineId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        MedicineId(id)
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MedicineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned identity of a [`CartEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct CartEntryId(i64);

impl CartEntryId {
    #[inline]
    pub const fn new(id: i64) -> Self {
        CartEntryId(id)
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CartEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Medicine
// =============================================================================

/// A medicine in the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Medicine {
    /// Store-assigned identifier.
    pub id: MedicineId,

    /// Display name. Search matches this exactly (case-sensitive).
    pub name: String,

    /// Free-form category, e.g. "Analgesic".
    pub category: String,

    /// Unit price in minor units. Never negative.
    pub price_cents: i64,

    /// Units on hand. Overwritten as-is by stock updates.
    pub stock: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Medicine {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for creating a medicine (the store assigns the id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewMedicine {
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
}

impl NewMedicine {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
        stock: i64,
    ) -> Self {
        NewMedicine {
            name: name.into(),
            category: category.into(),
            price_cents: price.cents(),
            stock,
        }
    }
}

// =============================================================================
// Cart Entry
// =============================================================================

/// One medicine's line in the cart.
///
/// ## Invariants
/// - `quantity > 0`
/// - `total_price_cents == medicine.price_cents * quantity` as of the last
///   write; the price is read from the medicine on every write, never cached
///   here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartEntry {
    pub id: CartEntryId,

    /// Referenced medicine. Looked up on demand, never embedded.
    pub medicine_id: MedicineId,

    pub quantity: i64,

    pub total_price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CartEntry {
    /// Returns the line total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// Input for creating a cart entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartEntry {
    pub medicine_id: MedicineId,
    pub quantity: i64,
    pub total_price_cents: i64,
}

// =============================================================================
// Read Models
// =============================================================================

/// A cart entry joined with its medicine's name, as shown in the cart view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    pub id: CartEntryId,
    pub medicine_id: MedicineId,
    pub medicine_name: String,
    pub quantity: i64,
    pub total_price_cents: i64,
}

impl CartLine {
    pub fn new(entry: &CartEntry, medicine_name: impl Into<String>) -> Self {
        CartLine {
            id: entry.id,
            medicine_id: entry.medicine_id,
            medicine_name: medicine_name.into(),
            quantity: entry.quantity,
            total_price_cents: entry.total_price_cents,
        }
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSummary {
    /// Number of distinct medicines in the cart.
    pub item_count: usize,
    /// Sum of quantities over all entries.
    pub total_quantity: i64,
    /// Sum of entry totals (grand total).
    pub total_cents: i64,
}

impl CartSummary {
    /// Folds `(quantity, total_price_cents)` pairs, rejecting overflow.
    ///
    /// Every stored entry is individually in range, but two of them can
    /// still add up past `i64::MAX`.
    fn from_lines(lines: impl Iterator<Item = (i64, i64)>) -> Result<Self, ValidationError> {
        let mut summary = CartSummary::default();
        let mut total = Money::zero();

        for (quantity, total_price_cents) in lines {
            summary.item_count += 1;
            summary.total_quantity = summary
                .total_quantity
                .checked_add(quantity)
                .ok_or_else(|| ValidationError::Overflow {
                    field: "cart quantity".to_string(),
                })?;
            total = total
                .checked_add(Money::from_cents(total_price_cents))
                .ok_or_else(|| ValidationError::Overflow {
                    field: "cart total".to_string(),
                })?;
        }

        summary.total_cents = total.cents();
        Ok(summary)
    }
}

impl TryFrom<&[CartEntry]> for CartSummary {
    type Error = ValidationError;

    fn try_from(entries: &[CartEntry]) -> Result<Self, Self::Error> {
        CartSummary::from_lines(entries.iter().map(|e| (e.quantity, e.total_price_cents)))
    }
}

impl TryFrom<&[CartLine]> for CartSummary {
    type Error = ValidationError;

    fn try_from(lines: &[CartLine]) -> Result<Self, Self::Error> {
        CartSummary::from_lines(lines.iter().map(|l| (l.quantity, l.total_price_cents)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, medicine: i64, quantity: i64, total: i64) -> CartEntry {
        CartEntry {
            id: CartEntryId::new(id),
            medicine_id: MedicineId::new(medicine),
            quantity,
            total_price_cents: total,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_from_entries() {
        let entries = vec![entry(1, 10, 3, 3000), entry(2, 11, 2, 499)];
        let summary = CartSummary::try_from(entries.as_slice()).unwrap();

        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_quantity, 5);
        assert_eq!(summary.total_cents, 3499);
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::try_from(Vec::<CartEntry>::new().as_slice()).unwrap();
        assert_eq!(summary, CartSummary::default());
    }

    #[test]
    fn test_summary_rejects_overflowing_quantity() {
        // Free medicine: each line total is 0 but the quantities don't fit
        let half = i64::MAX / 2 + 1;
        let entries = vec![entry(1, 10, half, 0), entry(2, 11, half, 0)];

        let err = CartSummary::try_from(entries.as_slice()).unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { ref field } if field == "cart quantity"));
    }

    #[test]
    fn test_summary_rejects_overflowing_total() {
        let half = i64::MAX / 2 + 1;
        let entries = vec![entry(1, 10, 1, half), entry(2, 11, 1, half)];

        let err = CartSummary::try_from(entries.as_slice()).unwrap_err();
        assert!(matches!(err, ValidationError::Overflow { ref field } if field == "cart total"));
    }

    #[test]
    fn test_summary_from_lines_matches_entries() {
        let entries = vec![entry(1, 10, 3, 3000), entry(2, 11, 2, 499)];
        let lines: Vec<CartLine> = entries.iter().map(|e| CartLine::new(e, "x")).collect();

        assert_eq!(
            CartSummary::try_from(lines.as_slice()).unwrap(),
            CartSummary::try_from(entries.as_slice()).unwrap()
        );
    }

    #[test]
    fn test_cart_line_serializes_camel_case() {
        let line = CartLine::new(&entry(7, 1, 2, 2000), "Paracetamol 500mg");
        let json = serde_json::to_value(&line).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["medicineId"], 1);
        assert_eq!(json["medicineName"], "Paracetamol 500mg");
        assert_eq!(json["totalPriceCents"], 2000);
    }

    #[test]
    fn test_new_medicine_from_money() {
        let new = NewMedicine::new("Cetirizine", "Antihistamine", Money::from_cents(450), 20);
        assert_eq!(new.price_cents, 450);
        assert_eq!(new.stock, 20);
    }
}
