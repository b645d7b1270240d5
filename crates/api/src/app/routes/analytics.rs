use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(category_summary))
        .route("/overview", get(inventory_overview))
        .route("/low-stock", get(low_stock))
}

/// Per-category counts, mean price and units, most populated category first.
pub async fn category_summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().aggregate_by_category().await {
        Ok(rows) => {
            let items = rows
                .into_iter()
                .map(dto::category_summary_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn inventory_overview(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.store().inventory_overview().await {
        Ok(overview) => (StatusCode::OK, Json(dto::overview_to_json(overview))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn low_stock(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::LowStockQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::rejection_to_response(e),
    };

    let (threshold, limit) = match query.resolve() {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().low_stock(threshold, limit).await {
        Ok(products) => {
            let items = products
                .into_iter()
                .map(dto::product_to_json)
                .collect::<Vec<_>>();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "threshold": threshold, "items": items })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
