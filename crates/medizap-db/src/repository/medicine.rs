//! # Medicine Repository
//!
//! SQL for the `medicines` table.
//!
//! ## Two Entry Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SqliteTx (store.rs)             MedicineRepository                     │
//! │  inside a transaction            straight on the pool                   │
//! │        │                                │                               │
//! │        │ &mut tx                        │ pool.acquire()                │
//! │        ▼                                ▼                               │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  get / find_by_name / list / insert / update / delete / count   │   │
//! │  │  (free functions over &mut SqliteConnection)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use medizap_core::{Medicine, MedicineId, NewMedicine};

/// Finds a medicine by id.
pub async fn get(conn: &mut SqliteConnection, id: MedicineId) -> DbResult<Option<Medicine>> {
    let medicine = sqlx::query_as::<_, Medicine>(
        r#"
        SELECT id, name, category, price_cents, stock, created_at, updated_at
        FROM medicines
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(medicine)
}

/// Finds the medicine named exactly `name`.
///
/// `=` on TEXT uses SQLite's BINARY collation, so the match is
/// case-sensitive. Duplicated names resolve to the lowest id.
pub async fn find_by_name(conn: &mut SqliteConnection, name: &str) -> DbResult<Option<Medicine>> {
    debug!(name = %name, "Finding medicine by name");

    let medicine = sqlx::query_as::<_, Medicine>(
        r#"
        SELECT id, name, category, price_cents, stock, created_at, updated_at
        FROM medicines
        WHERE name = ?1
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(name)
    .fetch_optional(conn)
    .await?;

    Ok(medicine)
}

/// Lists every medicine ordered by id.
pub async fn list(conn: &mut SqliteConnection) -> DbResult<Vec<Medicine>> {
    let medicines = sqlx::query_as::<_, Medicine>(
        r#"
        SELECT id, name, category, price_cents, stock, created_at, updated_at
        FROM medicines
        ORDER BY id
        "#,
    )
    .fetch_all(conn)
    .await?;

    Ok(medicines)
}

/// Inserts a medicine and returns the stored row.
pub async fn insert(conn: &mut SqliteConnection, medicine: &NewMedicine) -> DbResult<Medicine> {
    let now = Utc::now();

    let stored = sqlx::query_as::<_, Medicine>(
        r#"
        INSERT INTO medicines (name, category, price_cents, stock, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        RETURNING id, name, category, price_cents, stock, created_at, updated_at
        "#,
    )
    .bind(&medicine.name)
    .bind(&medicine.category)
    .bind(medicine.price_cents)
    .bind(medicine.stock)
    .bind(now)
    .fetch_one(conn)
    .await?;

    debug!(id = %stored.id, name = %stored.name, "Inserted medicine");
    Ok(stored)
}

/// Writes back name, category, price and stock.
///
/// ## Returns
/// * `Ok(Some(Medicine))` - The updated row
/// * `Ok(None)` - No row with that id
pub async fn update(conn: &mut SqliteConnection, medicine: &Medicine) -> DbResult<Option<Medicine>> {
    let updated = sqlx::query_as::<_, Medicine>(
        r#"
        UPDATE medicines
        SET name = ?2, category = ?3, price_cents = ?4, stock = ?5, updated_at = ?6
        WHERE id = ?1
        RETURNING id, name, category, price_cents, stock, created_at, updated_at
        "#,
    )
    .bind(medicine.id)
    .bind(&medicine.name)
    .bind(&medicine.category)
    .bind(medicine.price_cents)
    .bind(medicine.stock)
    .bind(Utc::now())
    .fetch_optional(conn)
    .await?;

    Ok(updated)
}

/// Deletes a medicine. Returns whether a row was removed.
pub async fn delete(conn: &mut SqliteConnection, id: MedicineId) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM medicines WHERE id = ?1")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Counts medicines.
pub async fn count(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicines")
        .fetch_one(conn)
        .await?;

    Ok(count)
}

/// Repository for medicine reads and inserts outside a transaction.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.medicines();
///
/// if repo.count().await? == 0 {
///     repo.insert(&NewMedicine::new("Paracetamol", "Analgesic", Money::from_cents(1000), 50)).await?;
/// }
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    /// Gets a medicine by its ID.
    pub async fn get_by_id(&self, id: MedicineId) -> DbResult<Option<Medicine>> {
        let mut conn = self.pool.acquire().await?;
        get(&mut conn, id).await
    }

    /// Finds a medicine by exact name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Medicine>> {
        let mut conn = self.pool.acquire().await?;
        find_by_name(&mut conn, name).await
    }

    /// Lists every medicine.
    pub async fn list(&self) -> DbResult<Vec<Medicine>> {
        let mut conn = self.pool.acquire().await?;
        list(&mut conn).await
    }

    /// Inserts a medicine.
    pub async fn insert(&self, medicine: &NewMedicine) -> DbResult<Medicine> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, medicine).await
    }

    /// Counts medicines (used by the seeder).
    pub async fn count(&self) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        count(&mut conn).await
    }
}
