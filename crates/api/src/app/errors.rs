use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use nexus_core::DomainError;
use nexus_infra::StoreError;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::DuplicateSku(sku) => json_error(
            StatusCode::BAD_REQUEST,
            "duplicate_sku",
            format!("SKU already registered: {sku}"),
        ),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::DuplicateKey(sku) => domain_error_to_response(DomainError::DuplicateSku(sku)),
        StoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "catalog store unavailable");
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", "catalog store unavailable")
        }
        StoreError::Corrupt(msg) => {
            tracing::error!(error = %msg, "corrupt catalog record");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn not_found(sku: &str) -> axum::response::Response {
    json_error(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("product not found: {sku}"),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Map an extractor rejection (bad JSON body, unparseable query) onto the
/// `validation_error` shape.
pub fn rejection_to_response(rejection: impl std::fmt::Display) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.to_string())
}
