use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use nexus_products::InventoryReport;

use crate::app::errors;
use crate::app::export;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/inventory.xlsx", get(inventory_xlsx))
}

/// Whole-catalog stock valuation as a spreadsheet download.
pub async fn inventory_xlsx(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let products = match services.store().list_all().await {
        Ok(p) => p,
        Err(e) => return errors::store_error_to_response(e),
    };

    let report = InventoryReport::from_products(&products);
    let generated_at = chrono::Local::now().naive_local();

    let bytes = match export::inventory_workbook(&report, generated_at) {
        Ok(b) => b,
        Err(e) => {
            tracing::error!(error = %e, "failed to render inventory workbook");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "export_error",
                e.to_string(),
            );
        }
    };

    tracing::info!(skus = report.sku_count, bytes = bytes.len(), "inventory report exported");

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, export::XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::INVENTORY_FILENAME),
            ),
        ],
        bytes,
    )
        .into_response()
}
