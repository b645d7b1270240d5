//! Products domain module (catalog records).
//!
//! This crate contains business rules for the product catalog, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod query;
pub mod report;
pub mod sku;

pub use product::{
    resolve_image_url, NewProduct, Product, ProductChanges, ProductPatch, Specifications,
    StockStatus, DEFAULT_IMAGE_URL, LOW_STOCK_THRESHOLD,
};
pub use query::{category_key, round_cents, CategorySummary, InventoryOverview, ProductFilter};
pub use report::{InventoryReport, InventoryReportRow};
pub use sku::suggest_sku;
