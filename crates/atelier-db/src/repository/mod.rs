//! # Repository Module
//!
//! Database repository implementations for Atelier.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.orders().create_order(&lines)                        │
//! │       ▼                                                                 │
//! │  ArtisanRepository   list, get_by_id, create, update, delete, count    │
//! │  ProductRepository   list, get_by_id, create, update, delete, count    │
//! │  OrderRepository     create_order, get_order, list_orders,             │
//! │                      cancel_order                                      │
//! │  ReportRepository    low_stock, sales_summary                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories hold a clone of the pool and are created on demand through
//! [`Database`](crate::Database).

pub mod artisan;
pub mod order;
pub mod product;
pub mod report;
