//! Catalog Store: the single source of truth for product records.
//!
//! The store is a direct, synchronous-per-request façade over the persistence
//! layer. It never retries; callers decide how to surface failures.

use std::sync::Arc;

use thiserror::Error;

use nexus_core::{Page, PageRequest};
use nexus_products::{CategorySummary, InventoryOverview, Product, ProductChanges, ProductFilter};

pub mod sqlite;

pub use sqlite::SqliteCatalogStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert hit an existing primary key.
    #[error("duplicate sku: {0}")]
    DuplicateKey(String),

    /// The persistence layer could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A stored row could not be decoded into a product.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Result of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The change set was applied; carries the post-update record.
    Updated(Product),
    /// No record with that SKU exists.
    NotFound,
    /// The change set was empty. Nothing was written.
    NoChanges,
}

/// Persistence abstraction over product records.
///
/// ## Semantics
///
/// - `create` persists a validated record and returns it verbatim. Uniqueness of
///   `sku` is enforced here as a last line (`StoreError::DuplicateKey`), but the
///   API checks first.
/// - `get_by_sku` returns `Ok(None)` on a miss; absence is not an error.
/// - `list_filtered` returns one page in insertion order together with the
///   number of records matching the filter before pagination.
/// - `update` applies only the supplied fields, atomically per record.
///   `specifications`, when supplied, replaces the stored map wholesale.
/// - `delete` reports whether a record was actually removed.
/// - `aggregate_by_category` groups the whole catalog, most populated first.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create(&self, product: Product) -> Result<Product, StoreError>;

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError>;

    async fn list_filtered(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, StoreError>;

    async fn update(&self, sku: &str, changes: &ProductChanges) -> Result<UpdateOutcome, StoreError>;

    async fn delete(&self, sku: &str) -> Result<bool, StoreError>;

    async fn aggregate_by_category(&self) -> Result<Vec<CategorySummary>, StoreError>;

    /// Whole-catalog KPIs (counts, units on hand, stock value, mean price).
    async fn inventory_overview(&self) -> Result<InventoryOverview, StoreError>;

    /// Products with `stock < threshold`, lowest stock first.
    async fn low_stock(&self, threshold: u32, limit: u32) -> Result<Vec<Product>, StoreError>;

    /// Every product in insertion order (report export).
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn create(&self, product: Product) -> Result<Product, StoreError> {
        (**self).create(product).await
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        (**self).get_by_sku(sku).await
    }

    async fn list_filtered(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        (**self).list_filtered(filter, page).await
    }

    async fn update(&self, sku: &str, changes: &ProductChanges) -> Result<UpdateOutcome, StoreError> {
        (**self).update(sku, changes).await
    }

    async fn delete(&self, sku: &str) -> Result<bool, StoreError> {
        (**self).delete(sku).await
    }

    async fn aggregate_by_category(&self) -> Result<Vec<CategorySummary>, StoreError> {
        (**self).aggregate_by_category().await
    }

    async fn inventory_overview(&self) -> Result<InventoryOverview, StoreError> {
        (**self).inventory_overview().await
    }

    async fn low_stock(&self, threshold: u32, limit: u32) -> Result<Vec<Product>, StoreError> {
        (**self).low_stock(threshold, limit).await
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_all().await
    }
}
