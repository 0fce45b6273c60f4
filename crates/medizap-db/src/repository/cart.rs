//! # Cart Repository
//!
//! SQL for the `cart_entries` table.
//!
//! The UNIQUE index on `cart_entries.medicine_id` guarantees one row per
//! medicine even if two writers race past the service-level lock.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use medizap_core::{CartEntry, CartEntryId, CartLine, MedicineId, NewCartEntry};

/// Finds a cart entry by id.
pub async fn get(conn: &mut SqliteConnection, id: CartEntryId) -> DbResult<Option<CartEntry>> {
    let entry = sqlx::query_as::<_, CartEntry>(
        r#"
        SELECT id, medicine_id, quantity, total_price_cents, created_at, updated_at
        FROM cart_entries
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(entry)
}

/// Finds the entry for `medicine_id`, if the medicine is in the cart.
pub async fn find_by_medicine(
    conn: &mut SqliteConnection,
    medicine_id: MedicineId,
) -> DbResult<Option<CartEntry>> {
    let entry = sqlx::query_as::<_, CartEntry>(
        r#"
        SELECT id, medicine_id, quantity, total_price_cents, created_at, updated_at
        FROM cart_entries
        WHERE medicine_id = ?1
        "#,
    )
    .bind(medicine_id)
    .fetch_optional(conn)
    .await?;

    Ok(entry)
}

/// Lists every entry ordered by id.
pub async fn list(conn: &mut SqliteConnection) -> DbResult<Vec<CartEntry>> {
    let entries = sqlx::query_as::<_, CartEntry>(
        r#"
        SELECT id, medicine_id, quantity, total_price_cents, created_at, updated_at
        FROM cart_entries
        ORDER BY id
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(entries)
}

/// Lists entries joined with medicine names, ordered by id.
pub async fn list_lines(conn: &mut SqliteConnection) -> DbResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT
            c.id,
            c.medicine_id,
            m.name AS medicine_name,
            c.quantity,
            c.total_price_cents
        FROM cart_entries c
        INNER JOIN medicines m ON m.id = c.medicine_id
        ORDER BY c.id
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(lines)
}

/// Inserts an entry and returns the stored row.
///
/// Fails with `DbError::UniqueViolation` if the medicine already has one.
pub async fn insert(conn: &mut SqliteConnection, entry: &NewCartEntry) -> DbResult<CartEntry> {
    let now = Utc::now();

    let stored = sqlx::query_as::<_, CartEntry>(
        r#"
        INSERT INTO cart_entries (medicine_id, quantity, total_price_cents, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?4)
        RETURNING id, medicine_id, quantity, total_price_cents, created_at, updated_at
        "#,
    )
    .bind(entry.medicine_id)
    .bind(entry.quantity)
    .bind(entry.total_price_cents)
    .bind(now)
    .fetch_one(conn)
    .await?;

    debug!(id = %stored.id, medicine_id = %stored.medicine_id, "Inserted cart entry");
    Ok(stored)
}

/// Writes back quantity and total.
///
/// ## Returns
/// * `Ok(Some(CartEntry))` - The updated row
/// * `Ok(None)` - No row with that id
pub async fn update(conn: &mut SqliteConnection, entry: &CartEntry) -> DbResult<Option<CartEntry>> {
    let updated = sqlx::query_as::<_, CartEntry>(
        r#"
        UPDATE cart_entries
        SET quantity = ?2, total_price_cents = ?3, updated_at = ?4
        WHERE id = ?1
        RETURNING id, medicine_id, quantity, total_price_cents, created_at, updated_at
        "#,
    )
    .bind(entry.id)
    .bind(entry.quantity)
    .bind(entry.total_price_cents)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;

    Ok(updated)
}

/// Deletes one entry. Returns whether a row was removed.
pub async fn delete(conn: &mut SqliteConnection, id: CartEntryId) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM cart_entries WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes the entries of one medicine. Returns the number removed.
pub async fn delete_for_medicine(
    conn: &mut SqliteConnection,
    medicine_id: MedicineId,
) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM cart_entries WHERE medicine_id = ?1")
        .bind(medicine_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes every entry. Returns the number removed.
pub async fn delete_all(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM cart_entries")
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Repository for cart reads outside a transaction.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Lists every entry.
    pub async fn list(&self) -> DbResult<Vec<CartEntry>> {
        let mut conn = self.pool.acquire().await?;
        list(&mut conn).await
    }

    /// Lists entries with medicine names.
    pub async fn lines(&self) -> DbResult<Vec<CartLine>> {
        let mut conn = self.pool.acquire().await?;
        list_lines(&mut conn).await
    }
}
