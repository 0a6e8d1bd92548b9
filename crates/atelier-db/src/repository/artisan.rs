//! # Artisan Repository
//!
//! Single-table CRUD for artisans.
//!
//! Deleting an artisan does not touch its products' rows directly: the
//! `ON DELETE SET NULL` foreign key clears `products.artisan_id`.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use atelier_core::{Artisan, ArtisanDraft};

const SELECT_ARTISAN: &str = r#"
    SELECT id, name, contact_info, craft_types, lead_time_days
    FROM artisans
"#;

/// Repository for artisan database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ArtisanRepository::new(pool);
/// let artisan = repo.create(&draft).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ArtisanRepository {
    pool: SqlitePool,
}

impl ArtisanRepository {
    /// Creates a new ArtisanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ArtisanRepository { pool }
    }

    /// Lists every artisan ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Artisan>> {
        let sql = format!("{SELECT_ARTISAN} ORDER BY id");
        let artisans = sqlx::query_as::<_, Artisan>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = artisans.len(), "Listed artisans");
        Ok(artisans)
    }

    /// Gets an artisan by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Artisan))` - Artisan found
    /// * `Ok(None)` - Artisan not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Artisan>> {
        let sql = format!("{SELECT_ARTISAN} WHERE id = ?1");
        let artisan = sqlx::query_as::<_, Artisan>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(artisan)
    }

    /// Inserts a validated artisan and returns the stored row.
    pub async fn create(&self, draft: &ArtisanDraft) -> DbResult<Artisan> {
        debug!(name = %draft.name, "Inserting artisan");

        let artisan = sqlx::query_as::<_, Artisan>(
            r#"
            INSERT INTO artisans (name, contact_info, craft_types, lead_time_days)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, name, contact_info, craft_types, lead_time_days
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.contact_info)
        .bind(&draft.craft_types)
        .bind(draft.lead_time_days)
        .fetch_one(&self.pool)
        .await?;

        Ok(artisan)
    }

    /// Replaces every field of an existing artisan.
    ///
    /// ## Returns
    /// * `Ok(Artisan)` - The updated row
    /// * `Err(DbError::NotFound)` - Artisan doesn't exist
    pub async fn update(&self, id: i64, draft: &ArtisanDraft) -> DbResult<Artisan> {
        debug!(id, "Updating artisan");

        sqlx::query_as::<_, Artisan>(
            r#"
            UPDATE artisans SET
                name = ?2,
                contact_info = ?3,
                craft_types = ?4,
                lead_time_days = ?5
            WHERE id = ?1
            RETURNING id, name, contact_info, craft_types, lead_time_days
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.contact_info)
        .bind(&draft.craft_types)
        .bind(draft.lead_time_days)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Artisan", id))
    }

    /// Deletes an artisan. Products that referenced it keep existing with
    /// `artisan_id = NULL`.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting artisan");

        let result = sqlx::query("DELETE FROM artisans WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Artisan", id));
        }

        Ok(())
    }

    /// Counts artisans (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM artisans")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
