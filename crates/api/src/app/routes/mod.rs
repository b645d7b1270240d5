use axum::Router;

pub mod analytics;
pub mod products;
pub mod reports;
pub mod system;

/// Router for all catalog endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(products::router())
        .nest("/analytics", analytics::router())
        .nest("/reports", reports::router())
}
