//! # Schema Migrations
//!
//! The marketplace schema ships inside the binary and is brought up to date
//! every time a [`Database`](crate::Database) opens.
//!
//! ```text
//! migrations/sqlite/
//!   001_initial_schema.sql   artisans, products (CHECK stock >= 0),
//!                            orders (ACTIVE | CANCELLED), order_items
//!   002_add_indexes.sql      artisan link, stock scans, status + date
//!                            range, order_items by order and by product
//! ```
//!
//! Applied versions are tracked in `_sqlx_migrations`. Files are append-only:
//! a schema change is a new `NNN_name.sql`, never an edit to a shipped one.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static SCHEMA: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applied and embedded migration counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    pub embedded: usize,
    pub applied: usize,
}

/// Applies every embedded migration the database has not seen yet.
///
/// Already-applied versions are skipped, so reopening an existing file is a
/// no-op.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<SchemaStatus> {
    debug!(embedded = SCHEMA.migrations.len(), "Applying schema migrations");

    SCHEMA.run(pool).await?;

    let status = schema_status(pool).await?;
    info!(
        applied = status.applied,
        embedded = status.embedded,
        "Schema up to date"
    );
    Ok(status)
}

/// Reads how many migrations have been recorded as applied.
pub async fn schema_status(pool: &SqlitePool) -> DbResult<SchemaStatus> {
    let applied: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
            .fetch_one(pool)
            .await?;

    Ok(SchemaStatus {
        embedded: SCHEMA.migrations.len(),
        applied: usize::try_from(applied).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn bare_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_database_gets_full_schema() {
        let pool = bare_pool().await;

        let status = run_migrations(&pool).await.unwrap();
        assert_eq!(status, SchemaStatus { embedded: 2, applied: 2 });

        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name NOT IN ('_sqlx_migrations', 'sqlite_sequence')
            ORDER BY name
            "#,
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, ["artisans", "order_items", "orders", "products"]);
    }

    #[tokio::test]
    async fn test_rerun_applies_nothing_new() {
        let pool = bare_pool().await;

        let first = run_migrations(&pool).await.unwrap();
        let second = run_migrations(&pool).await.unwrap();
        assert_eq!(first, second);
    }
}
