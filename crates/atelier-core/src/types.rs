//! # Domain Types
//!
//! Core domain types used throughout Atelier.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Artisan      │◄──│    Product      │◄──│   OrderItem     │       │
//! │  │  ─────────────  │0..1  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  product_id     │       │
//! │  │  name           │   │  artisan_id     │   │  quantity       │       │
//! │  │  lead_time_days │   │  price, stock   │   │  price_at_order │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1..n           │
//! │                        ┌─────────────────┐   ┌────────▼────────┐       │
//! │                        │  OrderStatus    │◄──│     Order       │       │
//! │                        │  ─────────────  │   │  ─────────────  │       │
//! │                        │  ACTIVE         │   │  id, status     │       │
//! │                        │  CANCELLED      │   │  order_date     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by an SQLite `INTEGER PRIMARY KEY AUTOINCREMENT`
//! assigned by the database on insert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Artisan
// =============================================================================

/// A maker who supplies products to the marketplace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Artisan {
    pub id: i64,
    pub name: String,
    pub contact_info: Option<String>,
    /// Free text, e.g. "wood, textiles". Never parsed.
    pub craft_types: Option<String>,
    pub lead_time_days: i64,
}

/// Artisan fields as received from a client, before validation.
///
/// Every field is optional here so that a missing `name` becomes a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ArtisanInput {
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub craft_types: Option<String>,
    pub lead_time_days: Option<i64>,
}

/// Validated artisan fields with defaults applied, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtisanDraft {
    pub name: String,
    pub contact_info: Option<String>,
    pub craft_types: Option<String>,
    pub lead_time_days: i64,
}

// =============================================================================
// Product
// =============================================================================

/// A sellable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    /// `None` when the product has no artisan or its artisan was deleted.
    pub artisan_id: Option<i64>,
    pub cost: f64,
    pub price: f64,
    /// Units on hand. Never negative.
    pub stock: i64,
}

/// A product row joined with its artisan's name, as returned by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ProductListing {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub product: Product,
    pub artisan_name: Option<String>,
}

/// Product fields as received from a client, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub artisan_id: Option<i64>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Validated product fields with defaults applied, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: Option<String>,
    pub artisan_id: Option<i64>,
    pub cost: f64,
    pub price: f64,
    pub stock: i64,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of an order. The only transition is `Active → Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Placed; its line items count towards sales.
    Active,
    /// Cancelled; stock was restored and it is excluded from reports.
    Cancelled,
}

impl OrderStatus {
    /// Returns the value stored in the `orders.status` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Active => "ACTIVE",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub status: OrderStatus,
    /// Set once when the order is placed.
    #[ts(as = "String")]
    pub order_date: DateTime<Utc>,
}

/// A line item joined with the product name for display.
///
/// `price_at_order` is the product price captured when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub price_at_order: f64,
}

impl OrderItem {
    /// Quantity × frozen unit price.
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.price_at_order
    }
}

/// An order with its line items and computed total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub total: f64,
}

impl OrderDetails {
    /// Builds the details view, computing the order total from the items.
    pub fn new(order: Order, items: Vec<OrderItem>) -> Self {
        let total = items.iter().map(OrderItem::line_total).sum();
        OrderDetails { order, items, total }
    }
}

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

// =============================================================================
// Reports
// =============================================================================

/// Products at or below a stock threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LowStockReport {
    pub threshold: i64,
    pub items: Vec<Product>,
}

/// Revenue of one product category within a sales summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CategorySales {
    /// `None` groups products without a category.
    pub category: Option<String>,
    pub sales: f64,
}

/// Revenue of active orders within a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesSummary {
    pub total_sales: f64,
    pub top_categories: Vec<CategorySales>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, price_at_order: f64) -> OrderItem {
        OrderItem {
            id: 1,
            order_id: 1,
            product_id: 1,
            product_name: "Bowl".to_string(),
            quantity,
            price_at_order,
        }
    }

    #[test]
    fn test_order_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        assert_eq!(OrderStatus::Active.to_string(), "ACTIVE");
    }

    #[test]
    fn test_order_details_total() {
        let order = Order {
            id: 1,
            status: OrderStatus::Active,
            order_date: Utc::now(),
        };
        let details = OrderDetails::new(order, vec![item(2, 10.0), item(1, 4.5)]);
        assert!((details.total - 24.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_details_flattens_order_fields() {
        let order = Order {
            id: 3,
            status: OrderStatus::Active,
            order_date: Utc::now(),
        };
        let json = serde_json::to_value(OrderDetails::new(order, vec![item(1, 2.0)])).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["status"], "ACTIVE");
        assert_eq!(json["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_sales_summary_camel_case() {
        let summary = SalesSummary {
            total_sales: 0.0,
            top_categories: vec![],
        };
        let json = serde_json::to_value(summary).unwrap();
        assert!(json.get("totalSales").is_some());
        assert!(json.get("topCategories").is_some());
    }
}
