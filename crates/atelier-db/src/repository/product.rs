//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing with the owning artisan's name
//! - CRUD operations
//!
//! Stock is only changed here by a full replace (`update`). Order placement
//! and cancellation adjust it through the order engine's transaction.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use atelier_core::{Product, ProductDraft, ProductListing};

const PRODUCT_COLUMNS: &str = "id, name, category, artisan_id, cost, price, stock";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // All products with artisan names
/// let listings = repo.list().await?;
///
/// // Get by ID
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product joined with its artisan's name.
    ///
    /// ## Join
    /// ```text
    /// products p LEFT JOIN artisans a ON a.id = p.artisan_id
    ///
    /// Products without an artisan (or whose artisan was deleted)
    /// are still listed, with artisan_name = NULL.
    /// ```
    pub async fn list(&self) -> DbResult<Vec<ProductListing>> {
        let listings = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT
                p.id,
                p.name,
                p.category,
                p.artisan_id,
                p.cost,
                p.price,
                p.stock,
                a.name AS artisan_name
            FROM products p
            LEFT JOIN artisans a ON a.id = p.artisan_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = listings.len(), "Listed products");
        Ok(listings)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a validated product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its generated id
    /// * `Err(DbError::ForeignKeyViolation)` - `artisan_id` names no artisan
    pub async fn create(&self, draft: &ProductDraft) -> DbResult<Product> {
        debug!(name = %draft.name, "Inserting product");

        let sql = format!(
            r#"
            INSERT INTO products (name, category, artisan_id, cost, price, stock)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&draft.name)
            .bind(&draft.category)
            .bind(draft.artisan_id)
            .bind(draft.cost)
            .bind(draft.price)
            .bind(draft.stock)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    /// Replaces every field of an existing product, stock included.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The updated row
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, draft: &ProductDraft) -> DbResult<Product> {
        debug!(id, "Updating product");

        let sql = format!(
            r#"
            UPDATE products SET
                name = ?2,
                category = ?3,
                artisan_id = ?4,
                cost = ?5,
                price = ?6,
                stock = ?7
            WHERE id = ?1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&draft.name)
            .bind(&draft.category)
            .bind(draft.artisan_id)
            .bind(draft.cost)
            .bind(draft.price)
            .bind(draft.stock)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Fails with `DbError::ForeignKeyViolation` while order line items
    /// still reference it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use atelier_core::{ArtisanDraft, OrderLine};

    fn draft(name: &str, stock: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            category: Some("ceramics".to_string()),
            artisan_id: None,
            cost: 3.5,
            price: 10.0,
            stock,
        }
    }

    #[tokio::test]
    async fn test_list_includes_artisan_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let artisan = db
            .artisans()
            .create(&ArtisanDraft {
                name: "Bea".to_string(),
                contact_info: None,
                craft_types: None,
                lead_time_days: 0,
            })
            .await
            .unwrap();

        let mut linked = draft("Vase", 4);
        linked.artisan_id = Some(artisan.id);
        db.products().create(&linked).await.unwrap();
        db.products().create(&draft("Plate", 2)).await.unwrap();

        let listings = db.products().list().await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].artisan_name.as_deref(), Some("Bea"));
        assert_eq!(listings[1].artisan_name, None);
    }

    #[tokio::test]
    async fn test_create_with_unknown_artisan_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut orphan = draft("Vase", 1);
        orphan.artisan_id = Some(404);
        let err = db.products().create(&orphan).await.unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        let created = repo.create(&draft("Mug", 5)).await.unwrap();

        let updated = repo.update(created.id, &draft("Big Mug", 9)).await.unwrap();
        assert_eq!(updated.name, "Big Mug");
        assert_eq!(updated.stock, 9);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());

        let err = repo.delete(created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        let err = repo.update(created.id, &draft("Mug", 1)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_negative_stock_violates_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.products().create(&draft("Mug", 5)).await.unwrap();

        let err = db
            .products()
            .update(created.id, &draft("Mug", -1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_delete_referenced_product_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let product = db.products().create(&draft("Mug", 5)).await.unwrap();
        db.orders()
            .create_order(&[OrderLine {
                product_id: product.id,
                quantity: 1,
            }])
            .await
            .unwrap();

        let err = db.products().delete(product.id).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(db.products().get_by_id(product.id).await.unwrap().is_some());
    }
}
