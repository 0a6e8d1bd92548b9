//! # Order Repository (Order Engine)
//!
//! Places and cancels orders against product stock.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Order Lifecycle                                 │
//! │                                                                         │
//! │  create_order([{product_id, quantity}, ...])                           │
//! │       │                                                                 │
//! │       │  BEGIN IMMEDIATE (one writer at a time)                        │
//! │       │  INSERT orders (ACTIVE, now)                                   │
//! │       │  for each line, in request order:                              │
//! │       │     SELECT stock, price      → missing? InsufficientStock?     │
//! │       │     INSERT order_items (price_at_order = price)                │
//! │       │     UPDATE products stock -= quantity                          │
//! │       │  COMMIT (or drop → ROLLBACK)                                   │
//! │       ▼                                                                 │
//! │  ┌────────┐     cancel_order(id)      ┌───────────┐                    │
//! │  │ ACTIVE │ ─────────────────────────►│ CANCELLED │                    │
//! │  └────────┘  stock += each quantity   └───────────┘                    │
//! │                                             │                           │
//! │                                             └── cancel again → rejected │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transactions
//! Every mutation holds a `sqlx::Transaction` opened with `BEGIN IMMEDIATE`,
//! so the write lock is taken before the first stock read. An early `?`
//! return drops the guard, and sqlx rolls the transaction back.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use atelier_core::validation::validate_order_lines;
use atelier_core::{CoreError, Order, OrderDetails, OrderItem, OrderLine, OrderStatus};

/// Statement that opens a write-exclusive SQLite transaction.
const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

/// Repository for orders and their line items.
///
/// ## Usage
/// ```rust,ignore
/// let orders = OrderRepository::new(pool);
///
/// let placed = orders
///     .create_order(&[OrderLine { product_id: 1, quantity: 2 }])
///     .await?;
///
/// orders.cancel_order(placed.order.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order atomically.
    ///
    /// Duplicate product ids are kept as separate line items; a later line
    /// sees the stock already taken by an earlier one.
    ///
    /// ## Returns
    /// * `Ok(OrderDetails)` - The committed order with items and total
    /// * `Err(DbError::Rejected(_))` - Empty list, bad quantity, unknown
    ///   product or insufficient stock. Nothing was written.
    pub async fn create_order(&self, lines: &[OrderLine]) -> DbResult<OrderDetails> {
        validate_order_lines(lines).map_err(CoreError::from)?;

        debug!(lines = lines.len(), "Placing order");

        let mut tx = self
            .pool
            .begin_with(BEGIN_IMMEDIATE)
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let details = match place_lines(&mut *tx, lines).await {
            Ok(details) => details,
            Err(err) => {
                warn!(error = %err, "Order rejected, rolling back");
                return Err(err);
            }
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_id = details.order.id,
            items = details.items.len(),
            total = details.total,
            "Order placed"
        );
        Ok(details)
    }

    /// Gets an order with its line items.
    ///
    /// ## Returns
    /// * `Ok(Some(OrderDetails))` - Order found
    /// * `Ok(None)` - Order not found
    pub async fn get_order(&self, id: i64) -> DbResult<Option<OrderDetails>> {
        let mut conn = self.pool.acquire().await?;

        let Some(order) = fetch_order(&mut *conn, id).await? else {
            return Ok(None);
        };
        let items = fetch_items(&mut *conn, id).await?;

        Ok(Some(OrderDetails::new(order, items)))
    }

    /// Lists all orders, newest first.
    pub async fn list_orders(&self) -> DbResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, status, order_date
            FROM orders
            ORDER BY order_date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = orders.len(), "Listed orders");
        Ok(orders)
    }

    /// Cancels an active order and returns its stock.
    ///
    /// ## Returns
    /// * `Ok(Order)` - The order, now `CANCELLED`
    /// * `Err(DbError::Rejected(CoreError::OrderNotFound))`
    /// * `Err(DbError::Rejected(CoreError::OrderAlreadyCancelled))`
    pub async fn cancel_order(&self, id: i64) -> DbResult<Order> {
        debug!(order_id = id, "Cancelling order");

        let mut tx = self
            .pool
            .begin_with(BEGIN_IMMEDIATE)
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let order = match restore_and_cancel(&mut *tx, id).await {
            Ok(order) => order,
            Err(err) => {
                warn!(order_id = id, error = %err, "Cancellation rejected, rolling back");
                return Err(err);
            }
        };

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(order_id = id, "Order cancelled, stock restored");
        Ok(order)
    }
}

// =============================================================================
// Transaction Bodies
// =============================================================================

/// Inserts the order header and every line. Runs inside the caller's
/// transaction; any error leaves it to be rolled back.
async fn place_lines(conn: &mut SqliteConnection, lines: &[OrderLine]) -> DbResult<OrderDetails> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (status, order_date)
        VALUES (?1, ?2)
        RETURNING id, status, order_date
        "#,
    )
    .bind(OrderStatus::Active)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    for line in lines {
        let row: Option<(i64, f64)> =
            sqlx::query_as("SELECT stock, price FROM products WHERE id = ?1")
                .bind(line.product_id)
                .fetch_optional(&mut *conn)
                .await?;

        let (stock, price) = row.ok_or(CoreError::ProductNotFound(line.product_id))?;

        if stock < line.quantity {
            return Err(CoreError::InsufficientStock {
                product_id: line.product_id,
                available: stock,
                requested: line.quantity,
            }
            .into());
        }

        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, price_at_order)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(order.id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(price)
        .execute(&mut *conn)
        .await?;

        sqlx::query("UPDATE products SET stock = stock - ?2 WHERE id = ?1")
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *conn)
            .await?;
    }

    let items = fetch_items(conn, order.id).await?;
    Ok(OrderDetails::new(order, items))
}

/// Adds each line item's quantity back to stock and marks the order
/// cancelled.
async fn restore_and_cancel(conn: &mut SqliteConnection, id: i64) -> DbResult<Order> {
    let order = fetch_order(conn, id)
        .await?
        .ok_or(CoreError::OrderNotFound(id))?;

    if order.status == OrderStatus::Cancelled {
        return Err(CoreError::OrderAlreadyCancelled(id).into());
    }

    let lines: Vec<(i64, i64)> =
        sqlx::query_as("SELECT product_id, quantity FROM order_items WHERE order_id = ?1 ORDER BY id")
            .bind(id)
            .fetch_all(&mut *conn)
            .await?;

    for (product_id, quantity) in lines {
        sqlx::query("UPDATE products SET stock = stock + ?2 WHERE id = ?1")
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *conn)
            .await?;
    }

    let order = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders SET status = ?2
        WHERE id = ?1
        RETURNING id, status, order_date
        "#,
    )
    .bind(id)
    .bind(OrderStatus::Cancelled)
    .fetch_one(&mut *conn)
    .await?;

    Ok(order)
}

async fn fetch_order(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>("SELECT id, status, order_date FROM orders WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(order)
}

async fn fetch_items(conn: &mut SqliteConnection, order_id: i64) -> DbResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        r#"
        SELECT
            oi.id,
            oi.order_id,
            oi.product_id,
            p.name AS product_name,
            oi.quantity,
            oi.price_at_order
        FROM order_items oi
        JOIN products p ON p.id = oi.product_id
        WHERE oi.order_id = ?1
        ORDER BY oi.id
        "#,
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(items)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use atelier_core::{ProductDraft, ValidationError};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn product(db: &Database, stock: i64, price: f64) -> i64 {
        db.products()
            .create(&ProductDraft {
                name: format!("Item {stock}"),
                category: Some("ceramics".to_string()),
                artisan_id: None,
                cost: 1.0,
                price,
                stock,
            })
            .await
            .unwrap()
            .id
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().stock
    }

    async fn table_count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    fn line(product_id: i64, quantity: i64) -> OrderLine {
        OrderLine {
            product_id,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_place_and_cancel_round_trip() {
        let db = setup().await;
        let id = product(&db, 20, 10.0).await;

        let placed = db.orders().create_order(&[line(id, 5)]).await.unwrap();
        assert_eq!(placed.order.status, OrderStatus::Active);
        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.items[0].price_at_order, 10.0);
        assert_eq!(placed.items[0].product_name, "Item 20");
        assert_eq!(placed.total, 50.0);
        assert_eq!(stock_of(&db, id).await, 15);

        let cancelled = db.orders().cancel_order(placed.order.id).await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.order_date, placed.order.order_date);
        assert_eq!(stock_of(&db, id).await, 20);

        let err = db.orders().cancel_order(placed.order.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::OrderAlreadyCancelled(_))
        ));
        assert_eq!(stock_of(&db, id).await, 20);
    }

    #[tokio::test]
    async fn test_insufficient_stock_writes_nothing() {
        let db = setup().await;
        let id = product(&db, 3, 10.0).await;

        let err = db.orders().create_order(&[line(id, 5)]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            })
        ));

        assert_eq!(stock_of(&db, id).await, 3);
        assert_eq!(table_count(&db, "orders").await, 0);
        assert_eq!(table_count(&db, "order_items").await, 0);
    }

    #[tokio::test]
    async fn test_failing_later_line_rolls_back_earlier_lines() {
        let db = setup().await;
        let first = product(&db, 10, 2.0).await;
        let second = product(&db, 1, 2.0).await;

        let err = db
            .orders()
            .create_order(&[line(first, 4), line(second, 2)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientStock { product_id, .. }) if product_id == second
        ));

        assert_eq!(stock_of(&db, first).await, 10);
        assert_eq!(stock_of(&db, second).await, 1);
        assert_eq!(table_count(&db, "orders").await, 0);
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected() {
        let db = setup().await;
        let id = product(&db, 10, 2.0).await;

        let err = db
            .orders()
            .create_order(&[line(id, 1), line(999, 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::ProductNotFound(999))));
        assert_eq!(err.to_string(), "Product 999 not found");
        assert_eq!(stock_of(&db, id).await, 10);
    }

    #[tokio::test]
    async fn test_duplicate_lines_are_checked_sequentially() {
        let db = setup().await;
        let id = product(&db, 5, 3.0).await;

        let err = db
            .orders()
            .create_order(&[line(id, 3), line(id, 3)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::InsufficientStock { available: 2, .. })
        ));
        assert_eq!(stock_of(&db, id).await, 5);

        let placed = db
            .orders()
            .create_order(&[line(id, 2), line(id, 3)])
            .await
            .unwrap();
        assert_eq!(placed.items.len(), 2);
        assert_eq!(stock_of(&db, id).await, 0);

        db.orders().cancel_order(placed.order.id).await.unwrap();
        assert_eq!(stock_of(&db, id).await, 5);
    }

    #[tokio::test]
    async fn test_price_is_frozen_at_order_time() {
        let db = setup().await;
        let id = product(&db, 10, 10.0).await;
        let placed = db.orders().create_order(&[line(id, 1)]).await.unwrap();

        db.products()
            .update(
                id,
                &ProductDraft {
                    name: "Renamed".to_string(),
                    category: None,
                    artisan_id: None,
                    cost: 1.0,
                    price: 99.0,
                    stock: 9,
                },
            )
            .await
            .unwrap();

        let fetched = db.orders().get_order(placed.order.id).await.unwrap().unwrap();
        assert_eq!(fetched.items[0].price_at_order, 10.0);
        assert_eq!(fetched.total, 10.0);
    }

    #[tokio::test]
    async fn test_invalid_lines_rejected_before_transaction() {
        let db = setup().await;
        let id = product(&db, 10, 1.0).await;

        let err = db.orders().create_order(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let err = db.orders().create_order(&[line(id, 0)]).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rejected(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert_eq!(table_count(&db, "orders").await, 0);
    }

    #[tokio::test]
    async fn test_cancel_missing_order() {
        let db = setup().await;
        let err = db.orders().cancel_order(42).await.unwrap_err();
        assert!(matches!(err, DbError::Rejected(CoreError::OrderNotFound(42))));
        assert!(db.orders().get_order(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let db = setup().await;
        let id = product(&db, 10, 1.0).await;

        let first = db.orders().create_order(&[line(id, 1)]).await.unwrap();
        let second = db.orders().create_order(&[line(id, 1)]).await.unwrap();

        let orders = db.orders().list_orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, second.order.id);
        assert_eq!(orders[1].id, first.order.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_orders_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("orders.sqlite")).max_connections(8))
            .await
            .unwrap();
        let id = product(&db, 5, 1.0).await;

        let mut handles = Vec::new();
        for _ in 0..40 {
            let orders = db.orders();
            handles.push(tokio::spawn(async move {
                orders.create_order(&[line(id, 1)]).await
            }));
        }

        let mut placed = 0;
        let mut insufficient = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => placed += 1,
                Err(DbError::Rejected(CoreError::InsufficientStock { .. })) => insufficient += 1,
                Err(other) => panic!("unexpected failure under contention: {other}"),
            }
        }

        assert_eq!(placed, 5);
        assert_eq!(insufficient, 35);
        assert_eq!(stock_of(&db, id).await, 0);
        assert_eq!(table_count(&db, "orders").await, 5);

        db.close().await;
    }
}
