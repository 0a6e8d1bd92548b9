//! Report handlers.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use atelier_core::validation::{parse_report_date, parse_threshold};
use atelier_core::{LowStockReport, SalesSummary};

use crate::error::ApiResult;
use crate::extract::AppQuery;
use crate::AppState;

/// Query of `GET /api/reports/low-stock`. Kept as raw text so that a
/// non-numeric threshold falls back to the default instead of failing.
#[derive(Debug, Default, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<String>,
}

/// Query of `GET /api/reports/sales-summary`.
#[derive(Debug, Default, Deserialize)]
pub struct SalesSummaryQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// `GET /api/reports/low-stock?threshold=N`
pub async fn low_stock(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LowStockQuery>,
) -> ApiResult<Json<LowStockReport>> {
    let threshold = parse_threshold(query.threshold.as_deref());
    Ok(Json(state.db.reports().low_stock(threshold).await?))
}

/// `GET /api/reports/sales-summary?start=..&end=..`
///
/// Both bounds are required and inclusive.
pub async fn sales_summary(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SalesSummaryQuery>,
) -> ApiResult<Json<SalesSummary>> {
    let start = parse_report_date("start", query.start.as_deref())?;
    let end = parse_report_date("end", query.end.as_deref())?;

    Ok(Json(state.db.reports().sales_summary(start, end).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing;
    use atelier_core::{OrderLine, ProductDraft};
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};

    async fn product(state: &AppState, category: &str, price: f64, stock: i64) -> i64 {
        state
            .db
            .products()
            .create(&ProductDraft {
                name: format!("{category} item"),
                category: Some(category.to_string()),
                artisan_id: None,
                cost: 0.0,
                price,
                stock,
            })
            .await
            .unwrap()
            .id
    }

    fn low(threshold: Option<&str>) -> AppQuery<LowStockQuery> {
        AppQuery(LowStockQuery {
            threshold: threshold.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_low_stock_default_threshold() {
        let state = testing::state().await;
        for stock in [2, 5, 6, 10] {
            product(&state, "wood", 1.0, stock).await;
        }

        for raw in [None, Some("abc"), Some("0")] {
            let (status, body) = testing::json(low_stock(State(state.clone()), low(raw)).await).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["threshold"], 5);
            assert_eq!(body["items"].as_array().unwrap().len(), 2);
        }

        let (_, body) = testing::json(low_stock(State(state), low(Some("6"))).await).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sales_summary_requires_dates() {
        let state = testing::state().await;

        let query = AppQuery(SalesSummaryQuery {
            start: Some("2026-01-01".to_string()),
            end: None,
        });
        let (status, body) = testing::json(sales_summary(State(state.clone()), query).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let query = AppQuery(SalesSummaryQuery {
            start: Some("yesterday".to_string()),
            end: Some("2026-01-31".to_string()),
        });
        let (status, _) = testing::json(sales_summary(State(state), query).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sales_summary_shape() {
        let state = testing::state().await;
        let id = product(&state, "textiles", 15.0, 10).await;
        state
            .db
            .orders()
            .create_order(&[OrderLine {
                product_id: id,
                quantity: 2,
            }])
            .await
            .unwrap();

        let query = AppQuery(SalesSummaryQuery {
            start: Some((Utc::now() - Duration::days(1)).to_rfc3339()),
            end: Some((Utc::now() + Duration::days(1)).to_rfc3339()),
        });
        let (status, body) = testing::json(sales_summary(State(state), query).await).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalSales"], 30.0);
        assert_eq!(body["topCategories"][0]["category"], "textiles");
        assert_eq!(body["topCategories"][0]["sales"], 30.0);
    }
}
