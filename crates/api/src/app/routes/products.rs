use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use nexus_core::DomainError;
use nexus_infra::UpdateOutcome;
use nexus_products::{NewProduct, ProductPatch};

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/", get(list_products).post(create_product))
        .route("/products/sku-suggestion", get(suggest_sku))
        .route(
            "/products/:sku",
            get(get_product).put(update_product).delete(delete_product),
        )
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::rejection_to_response(e),
    };

    let product = match body.validate(services.image_placeholder()) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // Pre-check; the primary key still catches a concurrent insert of the same SKU.
    match services.store().get_by_sku(product.sku.as_str()).await {
        Ok(Some(_)) => {
            return errors::domain_error_to_response(DomainError::duplicate_sku(product.sku.as_str()));
        }
        Ok(None) => {}
        Err(e) => return errors::store_error_to_response(e),
    }

    match services.store().create(product).await {
        Ok(created) => {
            tracing::info!(sku = %created.sku, category = %created.category, "product created");
            (StatusCode::CREATED, Json(dto::product_to_json(created))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::ListProductsQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::rejection_to_response(e),
    };

    let (filter, page) = match query.into_parts() {
        Ok(parts) => parts,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().list_filtered(&filter, page).await {
        Ok(result) => (StatusCode::OK, Json(dto::page_to_json(result))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
) -> axum::response::Response {
    match services.store().get_by_sku(&sku).await {
        Ok(Some(p)) => (StatusCode::OK, Json(dto::product_to_json(p))).into_response(),
        Ok(None) => errors::not_found(&sku),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> axum::response::Response {
    let Json(patch) = match body {
        Ok(b) => b,
        Err(e) => return errors::rejection_to_response(e),
    };

    let changes = match patch.validate(services.image_placeholder()) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.store().update(&sku, &changes).await {
        Ok(UpdateOutcome::Updated(p)) => {
            tracing::info!(sku = %p.sku, "product updated");
            (StatusCode::OK, Json(dto::product_to_json(p))).into_response()
        }
        Ok(UpdateOutcome::NotFound) => errors::not_found(&sku),
        // Nothing to write: answer with the current record.
        Ok(UpdateOutcome::NoChanges) => get_product(Extension(services), Path(sku)).await,
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
) -> axum::response::Response {
    match services.store().delete(&sku).await {
        Ok(true) => {
            tracing::info!(sku = %sku, "product deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Ok(false) => errors::not_found(&sku),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn suggest_sku(
    query: Result<Query<dto::SkuSuggestionQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::rejection_to_response(e),
    };

    let sku = nexus_products::suggest_sku(&query.name, &query.category, &mut rand::thread_rng());
    (StatusCode::OK, Json(serde_json::json!({ "sku": sku }))).into_response()
}
