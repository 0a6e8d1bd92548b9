//! # Report Repository
//!
//! Read-only aggregate queries: low stock and sales summaries.
//!
//! Only `ACTIVE` orders count as sales. Revenue is always computed from
//! `price_at_order`, never from the current product price.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use atelier_core::{
    CategorySales, LowStockReport, OrderStatus, Product, SalesSummary, TOP_CATEGORY_LIMIT,
};

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Products whose stock is at or below `threshold`, lowest stock first.
    pub async fn low_stock(&self, threshold: i64) -> DbResult<LowStockReport> {
        let items = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, artisan_id, cost, price, stock
            FROM products
            WHERE stock <= ?1
            ORDER BY stock ASC, id ASC
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        debug!(threshold, count = items.len(), "Low-stock report");
        Ok(LowStockReport { threshold, items })
    }

    /// Total revenue and top categories of active orders placed within
    /// `[start, end]` (both inclusive).
    ///
    /// ## Aggregation
    /// ```text
    /// order_items ⋈ orders (status = ACTIVE, order_date in range)
    ///     total       = Σ quantity × price_at_order
    ///     by category = same sum GROUP BY products.category,
    ///                   highest first, at most TOP_CATEGORY_LIMIT rows
    /// ```
    pub async fn sales_summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<SalesSummary> {
        let total_sales: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(oi.quantity * oi.price_at_order), 0.0)
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            WHERE o.status = ?1
              AND o.order_date BETWEEN ?2 AND ?3
            "#,
        )
        .bind(OrderStatus::Active)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let top_categories = sqlx::query_as::<_, CategorySales>(
            r#"
            SELECT
                p.category AS category,
                SUM(oi.quantity * oi.price_at_order) AS sales
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.status = ?1
              AND o.order_date BETWEEN ?2 AND ?3
            GROUP BY p.category
            ORDER BY sales DESC
            LIMIT ?4
            "#,
        )
        .bind(OrderStatus::Active)
        .bind(start)
        .bind(end)
        .bind(TOP_CATEGORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            %start,
            %end,
            total_sales,
            categories = top_categories.len(),
            "Sales summary"
        );

        Ok(SalesSummary {
            total_sales,
            top_categories,
        })
    }
}
